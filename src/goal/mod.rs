//! Savings goals and the atomic wallet-to-goal transfer engine.

mod core;
mod endpoints;

pub use core::{
    Goal, NewGoal, add_savings, create_goal, create_goal_table, delete_goal, get_goal, list_goals,
    update_goal,
};
pub use endpoints::{
    add_savings_endpoint, create_goal_endpoint, delete_goal_endpoint, list_goals_endpoint,
    update_goal_endpoint,
};
