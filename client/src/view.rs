//! The rendering side of the city list.

use std::cell::RefCell;
use std::rc::Rc;

use listy_engine::City;

/// Something that draws the city list.
///
/// Called after every mirror rebuild with the complete new list. A view must
/// redraw from `items` alone and never keep positions from an earlier call.
pub trait ListView {
    fn data_changed(&mut self, items: &[City]);
}

impl<F> ListView for F
where
    F: FnMut(&[City]),
{
    fn data_changed(&mut self, items: &[City]) {
        self(items)
    }
}

#[derive(Debug, Default)]
struct Rendered {
    rows: Vec<String>,
    redraws: usize,
}

/// A list view that renders each city as a `"name province"` row.
///
/// Clones share the same rows, so one clone can be attached to a host while
/// another is read.
#[derive(Debug, Clone, Default)]
pub struct RenderedList {
    inner: Rc<RefCell<Rendered>>,
}

impl RenderedList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows as last drawn.
    pub fn rows(&self) -> Vec<String> {
        self.inner.borrow().rows.clone()
    }

    /// Number of times the list has been redrawn.
    pub fn redraws(&self) -> usize {
        self.inner.borrow().redraws
    }
}

impl ListView for RenderedList {
    fn data_changed(&mut self, items: &[City]) {
        let mut inner = self.inner.borrow_mut();
        inner.rows = items.iter().map(City::to_string).collect();
        inner.redraws += 1;
    }
}
