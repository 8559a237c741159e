//! Views for the quick panel.
//!
//! Views are headless: they turn host events into store calls and produce
//! plain frame data for the host to draw.

pub mod footer;
mod quick_panel;
pub mod row;
pub mod virtual_list;

pub use footer::{FooterView, KeyHint};
pub use quick_panel::{PanelFrame, QuickPanelView};
pub use row::{RowView, Suffix};
pub use virtual_list::{Align, VirtualList};
