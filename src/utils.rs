//! Utility functions
use std::future::Future;

use log::{error, info};

use crate::errors::GitRelocateError;

/// Outcome of one item of [`apply_all`]
#[derive(Debug)]
pub struct Outcome<'a, T> {
    /// The item
    pub item: &'a T,

    /// What happened to it
    pub result: Result<(), GitRelocateError>,
}

/// Per-item report of [`apply_all`], in the order of the items
#[derive(Debug)]
pub struct Report<'a, T> {
    /// One outcome per item
    pub outcomes: Vec<Outcome<'a, T>>,
}

impl<'a, T> Report<'a, T> {
    /// Number of items that went through
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Number of items that failed
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Items that failed
    pub fn failures(&self) -> impl Iterator<Item = &Outcome<'a, T>> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }
}

/// Run `op` on every item, one after the other.
///
/// A failing item is logged and does not stop the next ones.
pub(crate) async fn apply_all<'a, T, D, F, Fut>(
    items: &'a [T],
    describe: D,
    mut op: F,
) -> Report<'a, T>
where
    D: Fn(&T) -> String,
    F: FnMut(&'a T) -> Fut,
    Fut: Future<Output = Result<(), GitRelocateError>>,
{
    let mut outcomes = Vec::with_capacity(items.len());
    for item in items {
        let result = op(item).await;
        match &result {
            Ok(_) => info!("copied {}", describe(item)),
            Err(e) => error!("error copying {}: {e}", describe(item)),
        }
        outcomes.push(Outcome { item, result });
    }
    Report { outcomes }
}
