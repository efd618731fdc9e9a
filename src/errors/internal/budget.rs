use thiserror::Error;

#[derive(Error, Debug)]
pub enum BudgetError {
    #[error("Budget code not found: {cp_id}")]
    NotFound { cp_id: String },

    #[error("Budget code already exists: {codigo}")]
    DuplicateCode { codigo: String },

    #[error("Insufficient budget in {cp_id}: requested {requested}, available {available}")]
    InsufficientFunds {
        cp_id: String,
        requested: i64,
        available: i64,
    },

    #[error("Budget code {cp_id} is not in force")]
    NotInForce { cp_id: String },

    #[error("Budget code {cp_id} is referenced by {orders} order(s)")]
    InUse { cp_id: String, orders: u64 },

    #[error("Budget of {cp_id} cannot drop below committed amount {committed}")]
    BelowCommitted { cp_id: String, committed: i64 },
}
