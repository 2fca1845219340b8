//! The API endpoint URIs.

/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to update or delete a transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";

/// The route to list and create wallets.
pub const WALLETS: &str = "/api/wallets";
/// The route to update or delete a wallet.
pub const WALLET: &str = "/api/wallets/{wallet_id}";

/// The route to list and create categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route to update or delete a category.
pub const CATEGORY: &str = "/api/categories/{category_id}";

/// The route to list and create recurring bills.
pub const BILLS: &str = "/api/bills";
/// The route to update or delete a recurring bill.
pub const BILL: &str = "/api/bills/{bill_id}";
/// The route to pay a recurring bill.
pub const PAY_BILL: &str = "/api/bills/{bill_id}/pay";

/// The route to list and create savings goals.
pub const GOALS: &str = "/api/goals";
/// The route to update or delete a savings goal.
pub const GOAL: &str = "/api/goals/{goal_id}";
/// The route to transfer money from a wallet into a goal.
pub const GOAL_SAVINGS: &str = "/api/goals/{goal_id}/savings";

/// The route to list notifications.
pub const NOTIFICATIONS: &str = "/api/notifications";
/// The route to get the number of unread notifications.
pub const UNREAD_NOTIFICATION_COUNT: &str = "/api/notifications/unread-count";
/// The route to mark one notification as read or delete it.
pub const NOTIFICATION: &str = "/api/notifications/{notification_id}";
/// The route to mark all notifications as read.
pub const READ_ALL_NOTIFICATIONS: &str = "/api/notifications/read-all";

/// The route for the monthly report.
pub const MONTHLY_REPORT: &str = "/api/reports/monthly";
