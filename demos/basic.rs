//! This demo shows a single selector with a private cache. The output is
//! only recomputed when the projected slice changes.

use reselect::{eq, Memo};

struct Counter {
    value: i64,
    clicks: u32,
}

fn main() {
    let mut describe = Memo::new(
        |counter: &Counter| counter.value.signum(),
        eq::value,
        |sign: &i64| {
            println!("describing sign {sign}");
            match sign {
                -1 => "negative",
                0 => "zero",
                _ => "positive",
            }
        },
    );

    let mut counter = Counter { value: 0, clicks: 0 };
    describe.evaluate(&counter); // [Miss] The cache is empty.

    counter.clicks += 1;
    describe.evaluate(&counter); // [Hit] The value did not change.

    counter.value = 5;
    describe.evaluate(&counter); // [Miss] The sign changed.

    counter.value = 9;
    describe.evaluate(&counter); // [Hit] The sign stayed the same.

    println!("{} after {} clicks", describe.evaluate(&counter), counter.clicks);
}
