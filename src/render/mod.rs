//! Drawing code. Everything here reads app state and writes into a ratatui
//! buffer; no state changes except help scroll clamping.

pub mod chart_view;
pub mod context;
pub mod dashboard;
pub mod dialog;
pub mod layout;
pub mod notifications;
pub mod overlays;
pub mod table_view;
