use dnc::{ClosestPair, DeterministicSelect, MergeSort, Point, QuickSort};

const DEMO_ARRAY: [i64; 7] = [64, 34, 25, 12, 22, 11, 90];

const DEMO_POINTS: [Point; 6] = [
    Point::new(2.0, 3.0),
    Point::new(12.0, 30.0),
    Point::new(40.0, 50.0),
    Point::new(5.0, 1.0),
    Point::new(12.0, 10.0),
    Point::new(3.0, 4.0),
];

pub fn run() -> dnc::Result<()> {
    println!("Original array: {DEMO_ARRAY:?}");

    let mut merged = DEMO_ARRAY;
    MergeSort::new().sort(&mut merged);
    println!("After MergeSort: {merged:?}");

    let mut quick = DEMO_ARRAY;
    QuickSort::new().sort(&mut quick);
    println!("After QuickSort: {quick:?}");

    let median = DeterministicSelect::new().select(&DEMO_ARRAY, 3)?;
    println!("Median (k=3): {median}");

    println!();
    println!("Closest pair demo:");
    for point in &DEMO_POINTS {
        println!("  {point}");
    }
    let closest = ClosestPair::new().find_closest_pair(&DEMO_POINTS)?;
    println!("Closest pair: {closest}");
    Ok(())
}
