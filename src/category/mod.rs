//! Category management: income/expense labels with optional monthly budget
//! ceilings.

mod core;
mod endpoints;

pub use core::{
    Category, CategoryKind, NewCategory, create_category, create_category_table, delete_category,
    get_category, list_categories, update_category,
};
pub use endpoints::{
    create_category_endpoint, delete_category_endpoint, list_categories_endpoint,
    update_category_endpoint,
};
