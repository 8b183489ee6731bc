//! The journal engine: draft/post/void state machine and entry numbering.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use parkbooks_config::Config;
use parkbooks_domain::{Book, EntryDetail, EntryStatus, JournalEntry, Period};

use crate::error::{CoreError, Result};

/// One requested line for a draft entry.
#[derive(Debug, Clone)]
pub struct LineInput {
    pub category_id: Uuid,
    pub debit: Decimal,
    pub credit: Decimal,
}

impl LineInput {
    pub fn debit(category_id: Uuid, amount: Decimal) -> Self {
        Self {
            category_id,
            debit: amount,
            credit: Decimal::ZERO,
        }
    }

    pub fn credit(category_id: Uuid, amount: Decimal) -> Self {
        Self {
            category_id,
            debit: Decimal::ZERO,
            credit: amount,
        }
    }
}

/// Governs [`JournalEntry`] lifecycle: `Draft -> Posted`, `Draft -> Void`,
/// with reversal as the only correction path for posted entries.
pub struct JournalService;

impl JournalService {
    /// Creates a draft entry. Validation runs before the sequence counter is
    /// bumped, so a rejected draft never consumes an entry number.
    pub fn create_draft(
        book: &mut Book,
        config: &Config,
        date: NaiveDate,
        description: impl Into<String>,
        lines: Vec<LineInput>,
        reference: Option<&str>,
    ) -> Result<Uuid> {
        if lines.is_empty() {
            return Err(CoreError::Validation("entry requires at least one line".into()));
        }
        let mut details = Vec::with_capacity(lines.len());
        for (index, line) in lines.into_iter().enumerate() {
            let detail = EntryDetail {
                category_id: line.category_id,
                debit: line.debit,
                credit: line.credit,
                sort_order: index as u32,
            };
            if !detail.is_well_formed() {
                return Err(CoreError::Validation(format!(
                    "line {} must carry exactly one non-negative side",
                    index + 1
                )));
            }
            let category = book.category(detail.category_id).ok_or_else(|| {
                CoreError::NotFound(format!("category {}", detail.category_id))
            })?;
            if !category.is_active {
                return Err(CoreError::Validation(format!(
                    "category `{}` is inactive and rejects new postings",
                    category.code
                )));
            }
            details.push(detail);
        }

        let period = Period::from_date(date);
        let sequence = book.next_sequence(period);
        let entry_number = render_entry_number(&config.entry_number_format, period, sequence);
        let mut entry = JournalEntry::draft(entry_number, date, description, details);
        if let Some(reference) = reference {
            entry = entry.with_reference(reference);
        }
        let id = entry.id;
        book.entries.push(entry);
        book.touch();
        Ok(id)
    }

    /// Posts a draft: recomputes balance with exact decimal equality, then
    /// transitions the status and applies every line to the balance ledger
    /// as one unit. All checks precede the first mutation, so a failed post
    /// leaves the book untouched.
    pub fn post(book: &mut Book, entry_id: Uuid) -> Result<()> {
        let entry = book
            .entry(entry_id)
            .ok_or_else(|| CoreError::NotFound(format!("entry {entry_id}")))?;
        match entry.status {
            EntryStatus::Draft => {}
            status => {
                return Err(CoreError::InvalidTransition(format!(
                    "entry {} is {status}; only drafts can be posted",
                    entry.entry_number
                )))
            }
        }
        if entry.lines.is_empty() {
            return Err(CoreError::Validation("entry has no lines".into()));
        }
        let debits = entry.debit_total();
        let credits = entry.credit_total();
        if debits != credits {
            return Err(CoreError::UnbalancedEntry { debits, credits });
        }
        let period = entry.period();
        let lines = entry.lines.clone();
        for line in &lines {
            let category = book.category(line.category_id).ok_or_else(|| {
                CoreError::NotFound(format!("category {}", line.category_id))
            })?;
            if !category.is_active {
                return Err(CoreError::Validation(format!(
                    "category `{}` is inactive and rejects new postings",
                    category.code
                )));
            }
        }

        let entry = book
            .entry_mut(entry_id)
            .ok_or_else(|| CoreError::NotFound(format!("entry {entry_id}")))?;
        entry.status = EntryStatus::Posted;
        entry.total_amount = debits;
        let entry_number = entry.entry_number.clone();
        for line in &lines {
            // every category was resolved above; this cannot fail mid-loop
            crate::BalanceService::apply_posting(
                book,
                line.category_id,
                period,
                line.debit,
                line.credit,
            )?;
        }
        debug!(%entry_number, %period, "posted entry");
        Ok(())
    }

    /// Voids a draft. Posted entries are immutable; corrections go through
    /// [`JournalService::reverse`].
    pub fn void(book: &mut Book, entry_id: Uuid) -> Result<()> {
        let entry = book
            .entry_mut(entry_id)
            .ok_or_else(|| CoreError::NotFound(format!("entry {entry_id}")))?;
        match entry.status {
            EntryStatus::Draft => {
                entry.status = EntryStatus::Void;
                book.touch();
                Ok(())
            }
            status => Err(CoreError::InvalidTransition(format!(
                "entry {} is {status}; only drafts can be voided",
                entry.entry_number
            ))),
        }
    }

    /// Creates and posts a mirror-image entry correcting a posted one,
    /// linked back through its `reference`. Only legal on posted entries.
    pub fn reverse(
        book: &mut Book,
        config: &Config,
        entry_id: Uuid,
        date: NaiveDate,
        description: Option<&str>,
    ) -> Result<Uuid> {
        let entry = book
            .entry(entry_id)
            .ok_or_else(|| CoreError::NotFound(format!("entry {entry_id}")))?;
        if entry.status != EntryStatus::Posted {
            return Err(CoreError::InvalidTransition(format!(
                "entry {} is {}; only posted entries can be reversed",
                entry.entry_number, entry.status
            )));
        }
        let original_number = entry.entry_number.clone();
        let description = description
            .map(str::to_string)
            .unwrap_or_else(|| format!("Reversal of {original_number}"));
        let lines = entry
            .lines
            .iter()
            .map(|line| LineInput {
                category_id: line.category_id,
                debit: line.credit,
                credit: line.debit,
            })
            .collect();

        let reversal = Self::create_draft(
            book,
            config,
            date,
            description,
            lines,
            Some(&original_number),
        )?;
        Self::post(book, reversal)?;
        Ok(reversal)
    }
}

/// Renders an entry-number template: `{YYYY}` and `{MM}` from the period,
/// and a run of `#` in braces as the zero-padded sequence.
fn render_entry_number(template: &str, period: Period, sequence: u32) -> String {
    let mut out = template.replace("{YYYY}", &format!("{:04}", period.year));
    out = out.replace("{MM}", &format!("{:02}", period.month));
    if let Some(start) = out.find("{#") {
        if let Some(length) = out[start..].find('}') {
            let width = out[start + 1..start + length].len();
            let rendered = format!("{sequence:0width$}");
            out.replace_range(start..=start + length, &rendered);
        }
    }
    out
}
