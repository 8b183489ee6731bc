//! Persistence abstraction and consistency probes for books.

use std::collections::HashSet;

use parkbooks_domain::Book;

use crate::CoreError;

/// Abstraction over persistence backends capable of storing books.
pub trait BookStorage: Send + Sync {
    fn save_book(&self, name: &str, book: &Book) -> Result<(), CoreError>;
    fn load_book(&self, name: &str) -> Result<Book, CoreError>;
    fn list_books(&self) -> Result<Vec<String>, CoreError>;
    fn delete_book(&self, name: &str) -> Result<(), CoreError>;
}

/// Detects dangling references and cache drift within a book snapshot.
pub fn book_warnings(book: &Book) -> Vec<String> {
    let category_ids: HashSet<_> = book.categories.iter().map(|c| c.id).collect();
    let asset_ids: HashSet<_> = book.assets.iter().map(|a| a.id).collect();
    let entry_ids: HashSet<_> = book.entries.iter().map(|e| e.id).collect();
    let mut warnings = Vec::new();

    for entry in &book.entries {
        for line in &entry.lines {
            if !category_ids.contains(&line.category_id) {
                warnings.push(format!(
                    "entry {} references unknown category {}",
                    entry.entry_number, line.category_id
                ));
            }
        }
    }
    for row in &book.balances {
        if !category_ids.contains(&row.category_id) {
            warnings.push(format!(
                "balance row {}/{} references unknown category",
                row.category_id, row.period
            ));
        }
    }
    for row in &book.depreciation {
        if !asset_ids.contains(&row.asset_id) {
            warnings.push(format!(
                "depreciation row {} references unknown asset {}",
                row.period, row.asset_id
            ));
        }
        if !entry_ids.contains(&row.entry_id) {
            warnings.push(format!(
                "depreciation row {}/{} references missing entry {}",
                row.asset_id, row.period, row.entry_id
            ));
        }
    }
    for category in &book.categories {
        if let Some(parent_id) = category.parent_id {
            match book.category(parent_id) {
                None => warnings.push(format!(
                    "category `{}` references missing parent {}",
                    category.code, parent_id
                )),
                Some(parent) => {
                    let expected = format!("{}.{}", parent.full_path, category.code);
                    if category.full_path != expected {
                        warnings.push(format!(
                            "category `{}` full path `{}` does not match `{}`",
                            category.code, category.full_path, expected
                        ));
                    }
                }
            }
        }
    }
    warnings
}
