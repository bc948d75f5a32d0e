use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::thread;
use stockroom_core::{new_pool, Product, ProductRepository, SqliteProductRepository};

const WRITERS: usize = 4;
const SAVES_PER_WRITER: usize = 5;

// Each call borrows its own pooled connection, so cloned repository
// handles may write from multiple threads without shared state.
#[test]
fn concurrent_saves_through_cloned_repositories_all_persist() {
    let dir = tempfile::tempdir().unwrap();
    let pool = new_pool(dir.path().join("concurrent.db")).unwrap();
    let repo = SqliteProductRepository::try_new(pool).unwrap();

    let handles: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let repo = repo.clone();
            thread::spawn(move || {
                for item in 0..SAVES_PER_WRITER {
                    let mut product = Product::new(
                        format!("product-{writer}-{item}"),
                        "Acme",
                        Decimal::new(100 + item as i64, 2),
                        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                    );
                    let id = repo.save(&mut product).unwrap();
                    assert_eq!(product.id, Some(id));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let all = repo.find_all().unwrap();
    assert_eq!(all.len(), WRITERS * SAVES_PER_WRITER);
}
