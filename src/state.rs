use crate::matcher::{self, CompiledMatcher};
use crate::models::{Grouping, Transaction};

/// Everything the views are derived from. Replaced, never patched in place
/// by the views themselves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// `None` until a dataset has been loaded.
    pub transactions: Option<Vec<Transaction>>,
    pub groupings: Vec<Grouping>,
    pub searches: Vec<String>,
    pub name: String,
    /// Feedback for the last action, shown once.
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ReplaceTransactions(Vec<Transaction>),
    /// A description word was picked: search for it literally.
    AddWord(String),
    AddSearch(String),
    /// Setting a term to empty removes it.
    EditSearch { index: usize, value: String },
    ClearSearches,
    SetName(String),
    /// Turn the current name and searches into a grouping.
    Commit,
    /// Move a grouping back into the editable name and searches.
    PopGrouping(usize),
}

impl AppState {
    pub fn new(transactions: Option<Vec<Transaction>>, groupings: Vec<Grouping>) -> Self {
        Self {
            transactions,
            groupings,
            ..Self::default()
        }
    }
}

pub fn update(state: AppState, action: Action) -> AppState {
    let mut next = AppState {
        notice: None,
        ..state
    };
    match action {
        Action::ReplaceTransactions(rows) => {
            next.transactions = Some(rows);
        }
        Action::AddWord(word) => {
            if next.name.is_empty() {
                next.name = word.split(' ').next().unwrap_or_default().to_string();
            }
            next.searches.push(matcher::escape(&word));
        }
        Action::AddSearch(term) => {
            if !term.is_empty() {
                next.searches.push(term);
            }
        }
        Action::EditSearch { index, value } => {
            if index < next.searches.len() {
                if value.is_empty() {
                    next.searches.remove(index);
                } else {
                    next.searches[index] = value;
                }
            }
        }
        Action::ClearSearches => next.searches.clear(),
        Action::SetName(name) => next.name = name,
        Action::Commit => {
            if next.name.is_empty() {
                return next;
            }
            if let Err(e) = CompiledMatcher::compile(&next.searches) {
                next.notice = Some(format!("Not saved: {e}"));
                return next;
            }
            let grouping = Grouping::new(
                std::mem::take(&mut next.name),
                std::mem::take(&mut next.searches),
            );
            next.notice = Some(format!("Added grouping '{}'", grouping.name));
            next.groupings.push(grouping);
        }
        Action::PopGrouping(index) => {
            if index < next.groupings.len() {
                let grouping = next.groupings.remove(index);
                next.name = grouping.name;
                next.searches.extend(grouping.searches);
            }
        }
    }
    next
}
