// Résumé records: owner-scoped CRUD and the strict create-then-generate flow.

pub mod handlers;
pub mod store;
