//! parkbooks-storage-json
//!
//! Filesystem-backed JSON persistence for accounting books: one document per
//! book under a root directory, written atomically via a temp file.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use parkbooks_core::{storage::BookStorage, CoreError};
use parkbooks_domain::Book;

const BOOK_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Filesystem-backed JSON persistence for books.
#[derive(Debug, Clone)]
pub struct JsonBookStorage {
    books_dir: PathBuf,
}

impl JsonBookStorage {
    pub fn new(books_dir: PathBuf) -> Result<Self, CoreError> {
        fs::create_dir_all(&books_dir)?;
        Ok(Self { books_dir })
    }

    pub fn books_dir(&self) -> &Path {
        &self.books_dir
    }

    pub fn book_path(&self, name: &str) -> PathBuf {
        self.books_dir
            .join(format!("{}.{}", canonical_name(name), BOOK_EXTENSION))
    }

    fn write_atomically(&self, path: &Path, data: &str) -> Result<(), CoreError> {
        let tmp_path = path.with_extension(TMP_SUFFIX);
        {
            let mut file = File::create(&tmp_path)?;
            file.write_all(data.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

impl BookStorage for JsonBookStorage {
    fn save_book(&self, name: &str, book: &Book) -> Result<(), CoreError> {
        let data = serde_json::to_string_pretty(book)?;
        self.write_atomically(&self.book_path(name), &data)
    }

    fn load_book(&self, name: &str) -> Result<Book, CoreError> {
        let path = self.book_path(name);
        if !path.exists() {
            return Err(CoreError::NotFound(format!("book `{name}`")));
        }
        let data = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn list_books(&self) -> Result<Vec<String>, CoreError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.books_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some(BOOK_EXTENSION) {
                if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete_book(&self, name: &str) -> Result<(), CoreError> {
        let path = self.book_path(name);
        if !path.exists() {
            return Err(CoreError::NotFound(format!("book `{name}`")));
        }
        fs::remove_file(path)?;
        Ok(())
    }
}

/// Lowercase slug with path-hostile characters folded to dashes.
fn canonical_name(name: &str) -> String {
    let mut slug: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    while slug.contains("--") {
        slug = slug.replace("--", "-");
    }
    slug.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_name_slugs_spaces_and_case() {
        assert_eq!(canonical_name("Parque Central"), "parque-central");
        assert_eq!(canonical_name("  norte / 2024  "), "norte-2024");
        assert_eq!(canonical_name("plain_name"), "plain_name");
    }
}
