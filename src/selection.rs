use std::collections::BTreeSet;

use crate::models::ParsedTransaction;

/// Preview table sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Date,
    Payee,
    Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortOrder {
    /// First click on a column header: dates newest-first, everything else
    /// ascending.
    pub fn default_for(column: SortColumn) -> Self {
        let direction = match column {
            SortColumn::Date => SortDirection::Descending,
            SortColumn::Payee | SortColumn::Amount => SortDirection::Ascending,
        };
        SortOrder { column, direction }
    }

    pub fn reversed(self) -> Self {
        let direction = match self.direction {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        };
        SortOrder { direction, ..self }
    }
}

/// Sorted view over the preview rows, as indices into the original slice.
/// The underlying transactions never move, so selection indices stay stable
/// no matter how the table is sorted.
pub fn sorted_view(transactions: &[ParsedTransaction], order: SortOrder) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..transactions.len()).collect();
    indices.sort_by(|&a, &b| {
        let (ta, tb) = (&transactions[a], &transactions[b]);
        let ord = match order.column {
            SortColumn::Date => ta.date.cmp(&tb.date),
            SortColumn::Payee => {
                let pa = ta.payee.as_deref().unwrap_or("").to_lowercase();
                let pb = tb.payee.as_deref().unwrap_or("").to_lowercase();
                pa.cmp(&pb)
            }
            SortColumn::Amount => ta.amount.cmp(&tb.amount),
        };
        match order.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    indices
}

/// Which preview rows will be imported. Indices refer to positions in the
/// parsed transaction list, not to the current sort order.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    selected: BTreeSet<usize>,
    /// Anchor for shift-click range selection.
    last_touched: Option<usize>,
}

impl SelectionSet {
    /// Start with every row selected, the common case for a fresh preview.
    pub fn all(len: usize) -> Self {
        SelectionSet {
            selected: (0..len).collect(),
            last_touched: None,
        }
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Toggle one row, or extend from the last touched row when shift is
    /// held. A shift range only ever adds rows; it never deselects.
    pub fn toggle(&mut self, index: usize, shift_held: bool) {
        match (shift_held, self.last_touched) {
            (true, Some(anchor)) => {
                let (lo, hi) = if anchor <= index {
                    (anchor, index)
                } else {
                    (index, anchor)
                };
                self.selected.extend(lo..=hi);
            }
            _ => {
                if !self.selected.remove(&index) {
                    self.selected.insert(index);
                }
            }
        }
        self.last_touched = Some(index);
    }

    /// Select-all flip: if everything is already selected, clear; otherwise
    /// select every row.
    pub fn toggle_all(&mut self, len: usize) {
        if self.selected.len() == len {
            self.selected.clear();
        } else {
            self.selected = (0..len).collect();
        }
        self.last_touched = None;
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.last_touched = None;
    }

    /// Net signed sum of the selected rows, in cents.
    pub fn sum(&self, transactions: &[ParsedTransaction]) -> i64 {
        self.selected
            .iter()
            .filter_map(|&i| transactions.get(i))
            .map(|t| t.amount)
            .sum()
    }

    /// The selected transactions in their original order.
    pub fn selected_transactions<'a>(
        &self,
        transactions: &'a [ParsedTransaction],
    ) -> Vec<&'a ParsedTransaction> {
        self.selected
            .iter()
            .filter_map(|&i| transactions.get(i))
            .collect()
    }
}

#[cfg(test)]
#[path = "selection_tests.rs"]
mod tests;
