//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// The ID of a user, supplied by the external authentication layer.
pub type UserId = DatabaseId;

/// The ID of a wallet.
pub type WalletId = DatabaseId;

/// The ID of a category.
pub type CategoryId = DatabaseId;

/// The ID of a transaction.
pub type TransactionId = DatabaseId;

/// The ID of a recurring bill.
pub type BillId = DatabaseId;

/// The ID of a savings goal.
pub type GoalId = DatabaseId;

/// The ID of a notification.
pub type NotificationId = DatabaseId;
