//! Table-level operations, one `impl Database` block per table.

mod notes;
mod users;
