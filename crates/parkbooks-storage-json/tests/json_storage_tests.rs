use chrono::NaiveDate;
use rust_decimal_macros::dec;
use tempfile::tempdir;

use parkbooks_config::Config;
use parkbooks_core::storage::BookStorage;
use parkbooks_core::{CategoryService, ClassifierService, CoreError, DepreciationService};
use parkbooks_domain::{Book, Period, RawTransaction, SourceModule, TransactionRef, TransactionType};
use parkbooks_storage_json::JsonBookStorage;

fn storage() -> (tempfile::TempDir, JsonBookStorage) {
    let dir = tempdir().expect("tempdir");
    let storage = JsonBookStorage::new(dir.path().join("books")).expect("create storage");
    (dir, storage)
}

#[test]
fn save_and_load_round_trips_a_working_book() {
    let (_dir, storage) = storage();
    let config = Config::default();

    let mut book = Book::new("Parque Central");
    CategoryService::seed(&mut book).unwrap();
    let txn = RawTransaction::new(
        dec!(150.75),
        NaiveDate::from_ymd_opt(2024, 8, 2).unwrap(),
        TransactionType::Income,
        TransactionRef::new(SourceModule::Events, "evt-100"),
        "Concert entry fees",
    );
    ClassifierService::submit(&mut book, &config, txn).unwrap();
    DepreciationService::register(
        &mut book,
        "Stage",
        dec!(9000),
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        36,
        dec!(0),
    )
    .unwrap();
    DepreciationService::run(&mut book, &config, Period::new(2024, 8).unwrap()).unwrap();

    storage.save_book("parque central", &book).expect("save");
    let loaded = storage.load_book("parque central").expect("load");

    assert_eq!(loaded.name, "Parque Central");
    assert_eq!(loaded.categories.len(), book.categories.len());
    assert_eq!(loaded.entries.len(), book.entries.len());
    assert_eq!(loaded.balances, book.balances);
    assert_eq!(loaded.depreciation, book.depreciation);
    assert_eq!(loaded.entry_sequences, book.entry_sequences);

    // sequence counters survive the round trip: the next draft continues
    let mut loaded = loaded;
    let next = loaded.next_sequence(Period::new(2024, 8).unwrap());
    assert!(next > 1);
}

#[test]
fn list_and_delete_books() {
    let (_dir, storage) = storage();
    let book = Book::new("Norte");
    storage.save_book("Norte", &book).unwrap();
    storage.save_book("Sur", &book).unwrap();

    assert_eq!(storage.list_books().unwrap(), vec!["norte", "sur"]);
    storage.delete_book("Norte").unwrap();
    assert_eq!(storage.list_books().unwrap(), vec!["sur"]);
}

#[test]
fn loading_missing_book_is_not_found() {
    let (_dir, storage) = storage();
    assert!(matches!(
        storage.load_book("ghost"),
        Err(CoreError::NotFound(_))
    ));
}

#[test]
fn save_leaves_no_temp_file_behind() {
    let (_dir, storage) = storage();
    storage.save_book("tmp-check", &Book::new("Tmp")).unwrap();
    let tmp = storage.book_path("tmp-check").with_extension("tmp");
    assert!(!tmp.exists());
}
