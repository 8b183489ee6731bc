use serde::{Deserialize, Serialize};

use parkbooks_domain::{SourceModule, TransactionType};

/// Routes one `(module, kind)` pair to a category code pair.
///
/// `category` is the classified side (income, expense, or transfer
/// destination); `counter_category` is the mirrored cash/payable/contra side
/// (transfer origin).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassifierRule {
    pub module: SourceModule,
    pub kind: TransactionType,
    pub category: String,
    pub counter_category: String,
}

impl ClassifierRule {
    pub fn new(
        module: SourceModule,
        kind: TransactionType,
        category: impl Into<String>,
        counter_category: impl Into<String>,
    ) -> Self {
        Self {
            module,
            kind,
            category: category.into(),
            counter_category: counter_category.into(),
        }
    }
}

/// Engine configuration: entry numbering and transaction classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Entry-number template with `{YYYY}`, `{MM}`, and `{####}` placeholders.
    #[serde(default = "Config::default_entry_number_format")]
    pub entry_number_format: String,
    #[serde(default = "Config::default_classifier_rules")]
    pub classifier: Vec<ClassifierRule>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entry_number_format: Self::default_entry_number_format(),
            classifier: Self::default_classifier_rules(),
        }
    }
}

impl Config {
    pub fn default_entry_number_format() -> String {
        "AST-{YYYY}-{MM}-{####}".into()
    }

    /// Built-in routing table against the seeded chart of accounts.
    pub fn default_classifier_rules() -> Vec<ClassifierRule> {
        use SourceModule::*;
        use TransactionType::*;
        vec![
            ClassifierRule::new(Assets, Expense, "G-1-1", "A-1-1"),
            ClassifierRule::new(Assets, Depreciation, "G-1-3", "A-2-2"),
            ClassifierRule::new(Assets, Transfer, "A-1-2", "A-1-1"),
            ClassifierRule::new(Concessions, Income, "I-1-2", "A-1-1"),
            ClassifierRule::new(Concessions, Expense, "G-2-1", "A-1-1"),
            ClassifierRule::new(HumanResources, Expense, "G-1-2", "P-1-2"),
            ClassifierRule::new(Events, Income, "I-1-1", "A-1-1"),
            ClassifierRule::new(Events, Expense, "C-1-1", "A-1-1"),
        ]
    }

    /// Finds the routing rule for a `(module, kind)` pair, if configured.
    pub fn rule(&self, module: SourceModule, kind: TransactionType) -> Option<&ClassifierRule> {
        self.classifier
            .iter()
            .find(|rule| rule.module == module && rule.kind == kind)
    }
}
