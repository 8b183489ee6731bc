//! The category tree store: hierarchy maintenance and structural queries.

use tracing::info;
use uuid::Uuid;

use parkbooks_domain::{AccountNature, Book, Category, MAX_CATEGORY_LEVEL};

use crate::error::{CoreError, Result};

/// Parameters for creating a category under an optional parent.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub fiscal_code: Option<String>,
    /// Required for roots; children inherit when `None` and must match the
    /// top-level ancestor's nature when given.
    pub nature: Option<AccountNature>,
    pub sort_order: u32,
}

impl NewCategory {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: None,
            fiscal_code: None,
            nature: None,
            sort_order: 0,
        }
    }

    pub fn with_nature(mut self, nature: AccountNature) -> Self {
        self.nature = Some(nature);
        self
    }

    pub fn with_sort_order(mut self, sort_order: u32) -> Self {
        self.sort_order = sort_order;
        self
    }
}

/// Provides validated operations for the chart-of-accounts tree.
pub struct CategoryService;

impl CategoryService {
    /// Adds a category, enforcing depth, code shape, and nature invariants.
    pub fn create(book: &mut Book, parent_code: Option<&str>, input: NewCategory) -> Result<Uuid> {
        if book.category_by_code(&input.code).is_some() {
            return Err(CoreError::InvalidHierarchy(format!(
                "category `{}` already exists",
                input.code
            )));
        }

        let category = match parent_code {
            None => {
                let nature = input.nature.ok_or_else(|| {
                    CoreError::Validation("root categories require an explicit nature".into())
                })?;
                if input.code.contains('-') {
                    return Err(CoreError::InvalidHierarchy(format!(
                        "root code `{}` must not contain segment separators",
                        input.code
                    )));
                }
                Category::root(input.code, input.name, nature)
            }
            Some(parent_code) => {
                let parent = book.category_by_code(parent_code).ok_or_else(|| {
                    CoreError::NotFound(format!("parent category `{parent_code}`"))
                })?;
                if parent.level >= MAX_CATEGORY_LEVEL {
                    return Err(CoreError::InvalidHierarchy(format!(
                        "`{}` is at level {}; children would exceed the maximum depth of {}",
                        parent.code, parent.level, MAX_CATEGORY_LEVEL
                    )));
                }
                if !input.code.starts_with(&format!("{}-", parent.code))
                    || Category::level_from_code(&input.code) != parent.level + 1
                {
                    return Err(CoreError::InvalidHierarchy(format!(
                        "code `{}` does not extend parent `{}` by one segment",
                        input.code, parent.code
                    )));
                }
                if let Some(nature) = input.nature {
                    if nature != parent.nature {
                        return Err(CoreError::InvalidHierarchy(format!(
                            "nature {} contradicts branch nature {}",
                            nature, parent.nature
                        )));
                    }
                }
                Category::child_of(parent, input.code, input.name)
            }
        };

        let mut category = category.with_sort_order(input.sort_order);
        category.description = input.description;
        category.fiscal_code = input.fiscal_code;
        let id = category.id;
        book.categories.push(category);
        book.touch();
        Ok(id)
    }

    /// Resolves a code for reading; inactive categories still resolve so
    /// historical reports keep working.
    pub fn resolve<'a>(book: &'a Book, code: &str) -> Result<&'a Category> {
        book.category_by_code(code)
            .ok_or_else(|| CoreError::NotFound(format!("category `{code}`")))
    }

    /// Resolves a code for posting; inactive categories are rejected.
    pub fn resolve_for_posting<'a>(book: &'a Book, code: &str) -> Result<&'a Category> {
        let category = Self::resolve(book, code)?;
        if !category.is_active {
            return Err(CoreError::Validation(format!(
                "category `{}` is inactive and rejects new postings",
                category.code
            )));
        }
        Ok(category)
    }

    /// Direct children of a category, ordered by `sort_order` then code.
    pub fn children<'a>(book: &'a Book, code: &str) -> Result<Vec<&'a Category>> {
        let parent = Self::resolve(book, code)?;
        let mut children: Vec<&Category> = book
            .categories
            .iter()
            .filter(|category| category.parent_id == Some(parent.id))
            .collect();
        children.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.code.cmp(&b.code))
        });
        Ok(children)
    }

    /// Root-to-node ancestor chain; `full_path` must equal its dotted codes.
    pub fn path<'a>(book: &'a Book, code: &str) -> Result<Vec<&'a Category>> {
        let mut chain = Vec::new();
        let mut current = Some(Self::resolve(book, code)?);
        while let Some(category) = current {
            chain.push(category);
            current = match category.parent_id {
                Some(parent_id) => Some(book.category(parent_id).ok_or_else(|| {
                    CoreError::NotFound(format!(
                        "parent {} of category `{}`",
                        parent_id, category.code
                    ))
                })?),
                None => None,
            };
        }
        chain.reverse();
        Ok(chain)
    }

    /// Every category in the subtree rooted at `code`, including the root.
    pub fn subtree<'a>(book: &'a Book, code: &str) -> Result<Vec<&'a Category>> {
        let root = Self::resolve(book, code)?;
        let mut result = vec![root];
        let mut frontier = vec![root.id];
        while let Some(parent_id) = frontier.pop() {
            for category in &book.categories {
                if category.parent_id == Some(parent_id) {
                    result.push(category);
                    frontier.push(category.id);
                }
            }
        }
        Ok(result)
    }

    /// Lists categories, optionally including deactivated ones.
    pub fn list(book: &Book, include_inactive: bool) -> Vec<&Category> {
        let mut categories: Vec<&Category> = book
            .categories
            .iter()
            .filter(|category| include_inactive || category.is_active)
            .collect();
        categories.sort_by(|a, b| a.full_path.cmp(&b.full_path));
        categories
    }

    pub fn rename(book: &mut Book, code: &str, name: impl Into<String>) -> Result<()> {
        let id = Self::resolve(book, code)?.id;
        if let Some(category) = book.category_mut(id) {
            category.name = name.into();
        }
        book.touch();
        Ok(())
    }

    /// Soft-delete: the category stays for history but rejects new postings.
    pub fn deactivate(book: &mut Book, code: &str) -> Result<()> {
        let id = Self::resolve(book, code)?.id;
        if let Some(category) = book.category_mut(id) {
            category.is_active = false;
        }
        book.touch();
        Ok(())
    }

    /// Structural delete, refused for categories with children or postings.
    pub fn remove(book: &mut Book, code: &str) -> Result<()> {
        let category = Self::resolve(book, code)?;
        let id = category.id;
        if book.categories.iter().any(|c| c.parent_id == Some(id)) {
            return Err(CoreError::InvalidHierarchy(format!(
                "category `{code}` has child categories"
            )));
        }
        if book.category_has_postings(id) {
            return Err(CoreError::InvalidHierarchy(format!(
                "category `{code}` has posted transactions; deactivate it instead"
            )));
        }
        book.categories.retain(|c| c.id != id);
        book.touch();
        Ok(())
    }

    /// Seeds the fixed park chart of accounts. Idempotent: codes that exist
    /// are skipped, never duplicated. Returns the number inserted.
    pub fn seed(book: &mut Book) -> Result<usize> {
        let mut inserted = 0;
        for (parent, code, name, nature, sort_order) in seed_rows() {
            if book.category_by_code(code).is_some() {
                continue;
            }
            let mut input = NewCategory::new(code, name).with_sort_order(sort_order);
            if let Some(nature) = nature {
                input = input.with_nature(nature);
            }
            Self::create(book, parent, input)?;
            inserted += 1;
        }
        if inserted > 0 {
            info!(inserted, "seeded chart of accounts");
        }
        Ok(inserted)
    }
}

type SeedRow = (
    Option<&'static str>,
    &'static str,
    &'static str,
    Option<AccountNature>,
    u32,
);

/// The fixed 3-level park chart: six top-level branches with their
/// subcategories, in insertion order (parents before children).
fn seed_rows() -> Vec<SeedRow> {
    use AccountNature::*;
    vec![
        (None, "A", "Activos", Some(DebitNormal), 1),
        (Some("A"), "A-1", "Activo Corriente", None, 1),
        (Some("A-1"), "A-1-1", "Caja y Bancos", None, 1),
        (Some("A-1"), "A-1-2", "Cuentas por Cobrar", None, 2),
        (Some("A"), "A-2", "Activo Fijo", None, 2),
        (Some("A-2"), "A-2-1", "Equipo y Maquinaria", None, 1),
        (Some("A-2"), "A-2-2", "Depreciacion Acumulada", None, 2),
        (None, "P", "Pasivos", Some(CreditNormal), 2),
        (Some("P"), "P-1", "Pasivo Corriente", None, 1),
        (Some("P-1"), "P-1-1", "Cuentas por Pagar", None, 1),
        (Some("P-1"), "P-1-2", "Obligaciones Laborales", None, 2),
        (None, "PT", "Patrimonio", Some(CreditNormal), 3),
        (Some("PT"), "PT-1", "Capital", None, 1),
        (Some("PT-1"), "PT-1-1", "Aporte Municipal", None, 1),
        (None, "I", "Ingresos", Some(CreditNormal), 4),
        (Some("I"), "I-1", "Ingresos Operativos", None, 1),
        (Some("I-1"), "I-1-1", "Entradas y Actividades", None, 1),
        (Some("I-1"), "I-1-2", "Concesiones", None, 2),
        (Some("I"), "I-2", "Otros Ingresos", None, 2),
        (Some("I-2"), "I-2-1", "Donaciones", None, 1),
        (None, "C", "Costos", Some(DebitNormal), 5),
        (Some("C"), "C-1", "Costos de Operacion", None, 1),
        (Some("C-1"), "C-1-1", "Costos de Eventos", None, 1),
        (None, "G", "Gastos", Some(DebitNormal), 6),
        (Some("G"), "G-1", "Gastos Operativos", None, 1),
        (Some("G-1"), "G-1-1", "Gastos de Mantenimiento", None, 1),
        (Some("G-1"), "G-1-2", "Sueldos y Salarios", None, 2),
        (Some("G-1"), "G-1-3", "Gasto por Depreciacion", None, 3),
        (Some("G"), "G-2", "Gastos Administrativos", None, 2),
        (Some("G-2"), "G-2-1", "Servicios Publicos", None, 1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_book() -> Book {
        let mut book = Book::new("Parque Norte");
        CategoryService::seed(&mut book).unwrap();
        book
    }

    #[test]
    fn seed_is_idempotent() {
        let mut book = Book::new("Seed");
        let first = CategoryService::seed(&mut book).unwrap();
        assert!(first > 0);
        let count = book.categories.len();
        let second = CategoryService::seed(&mut book).unwrap();
        assert_eq!(second, 0);
        assert_eq!(book.categories.len(), count);
    }

    #[test]
    fn create_rejects_depth_beyond_five() {
        let mut book = seeded_book();
        CategoryService::create(
            &mut book,
            Some("A-1-1"),
            NewCategory::new("A-1-1-1", "Caja Chica"),
        )
        .unwrap();
        CategoryService::create(
            &mut book,
            Some("A-1-1-1"),
            NewCategory::new("A-1-1-1-1", "Fondo Menor"),
        )
        .unwrap();
        let too_deep = CategoryService::create(
            &mut book,
            Some("A-1-1-1-1"),
            NewCategory::new("A-1-1-1-1-1", "Nivel Seis"),
        );
        assert!(matches!(too_deep, Err(CoreError::InvalidHierarchy(_))));
    }

    #[test]
    fn create_rejects_nature_conflict() {
        let mut book = seeded_book();
        let conflict = CategoryService::create(
            &mut book,
            Some("A-1"),
            NewCategory::new("A-1-3", "Anticipos").with_nature(AccountNature::CreditNormal),
        );
        assert!(matches!(conflict, Err(CoreError::InvalidHierarchy(_))));
    }

    #[test]
    fn create_rejects_duplicate_code() {
        let mut book = seeded_book();
        let duplicate = CategoryService::create(
            &mut book,
            Some("A-1"),
            NewCategory::new("A-1-1", "Duplicada"),
        );
        assert!(matches!(duplicate, Err(CoreError::InvalidHierarchy(_))));
    }

    #[test]
    fn create_rejects_code_not_extending_parent() {
        let mut book = seeded_book();
        let bad = CategoryService::create(&mut book, Some("A-1"), NewCategory::new("B-9", "Ajena"));
        assert!(matches!(bad, Err(CoreError::InvalidHierarchy(_))));
    }

    #[test]
    fn children_are_ordered_by_sort_order() {
        let book = seeded_book();
        let children = CategoryService::children(&book, "G").unwrap();
        let codes: Vec<&str> = children.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["G-1", "G-2"]);
    }

    #[test]
    fn path_matches_full_path_cache() {
        let book = seeded_book();
        let chain = CategoryService::path(&book, "G-1-3").unwrap();
        let joined: Vec<&str> = chain.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(joined, vec!["G", "G-1", "G-1-3"]);
        let leaf = CategoryService::resolve(&book, "G-1-3").unwrap();
        assert_eq!(leaf.full_path, "G.G-1.G-1-3");
        assert_eq!(leaf.level, 3);
    }

    #[test]
    fn inactive_category_reads_but_rejects_postings() {
        let mut book = seeded_book();
        CategoryService::deactivate(&mut book, "I-2-1").unwrap();
        assert!(CategoryService::resolve(&book, "I-2-1").is_ok());
        assert!(matches!(
            CategoryService::resolve_for_posting(&book, "I-2-1"),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn remove_refuses_categories_with_children() {
        let mut book = seeded_book();
        assert!(matches!(
            CategoryService::remove(&mut book, "A-1"),
            Err(CoreError::InvalidHierarchy(_))
        ));
        CategoryService::remove(&mut book, "I-2-1").unwrap();
        assert!(CategoryService::resolve(&book, "I-2-1").is_err());
    }

    #[test]
    fn list_filters_inactive_and_sorts_by_path() {
        let mut book = seeded_book();
        CategoryService::deactivate(&mut book, "I-2-1").unwrap();
        let active = CategoryService::list(&book, false);
        assert!(active.iter().all(|c| c.is_active));
        let all = CategoryService::list(&book, true);
        assert_eq!(all.len(), active.len() + 1);
        let paths: Vec<&str> = all.iter().map(|c| c.full_path.as_str()).collect();
        let mut sorted = paths.clone();
        sorted.sort();
        assert_eq!(paths, sorted);
    }

    #[test]
    fn subtree_collects_all_descendants() {
        let book = seeded_book();
        let subtree = CategoryService::subtree(&book, "A").unwrap();
        assert_eq!(subtree.len(), 7);
    }
}
