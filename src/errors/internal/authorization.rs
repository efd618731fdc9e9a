use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthorizationError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Missing permission: {permission}")]
    MissingPermission { permission: String },

    #[error("Only the requester may {action} order {order_id}")]
    NotRequester { order_id: String, action: String },

    #[error("User {user_id} cannot review their own order {order_id}")]
    SelfReview { user_id: String, order_id: String },

    #[error("User {user_id} is not assigned to budget code {cp_id}")]
    BudgetCodeNotAssigned { user_id: String, cp_id: String },
}
