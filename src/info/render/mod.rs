//! Per-role render functions, registered into a `RenderTable`.

mod evil;
mod good;

use super::night_info::RenderTable;

pub(crate) fn register_all(table: &mut RenderTable) {
    evil::register(table);
    good::register(table);
}
