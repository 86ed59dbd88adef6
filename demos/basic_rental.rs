use rentkit::builder::RentalBuilder;

fn main() {
    // (movie, shop, price)
    let mut service = RentalBuilder::new()
        .build([(1u32, 2u32, 5u32), (1, 7, 4), (1, 5, 6), (2, 7, 3)])
        .expect("unique (movie, shop) pairs");

    println!("cheapest shops for movie 1: {:?}", service.query_available(&1));

    service.checkout(2, 1).expect("shop 2 has movie 1 available");
    service.checkout(7, 2).expect("shop 7 has movie 2 available");
    println!("after checkout: {:?}", service.query_available(&1));
    println!("checked out: {:?}", service.report_checked_out());

    if let Err(err) = service.checkout(2, 1) {
        println!("second checkout rejected: {err}");
    }

    service.checkin(2, 1).expect("shop 2 movie 1 is checked out");
    println!("after checkin: {:?}", service.query_available(&1));
}

// Expected output:
// cheapest shops for movie 1: [7, 2, 5]
// after checkout: [7, 5]
// checked out: [(7, 2), (2, 1)]
// second checkout rejected: item 1 from supplier 2 is already checked out
// after checkin: [7, 2, 5]
//
// Explanation: shops are ordered by price (4, 5, 6); the report orders by
// price too, so movie 2 at price 3 comes before movie 1 at price 5.
