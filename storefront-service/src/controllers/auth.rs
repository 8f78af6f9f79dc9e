use crate::{
    error::{Error, Result},
    responses::Reply,
    routing::PathParams,
};

/// Account endpoints; registered but not implemented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Register,
    Login,
    Logout,
    ForgotPassword,
    ResetPassword,
    Me,
}

impl AuthAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Register => "AuthController::register",
            Self::Login => "AuthController::login",
            Self::Logout => "AuthController::logout",
            Self::ForgotPassword => "AuthController::forgotPassword",
            Self::ResetPassword => "AuthController::resetPassword",
            Self::Me => "AuthController::me",
        }
    }

    fn pending_message(&self) -> &'static str {
        match self {
            Self::Register => "Registration endpoint - coming soon",
            Self::Login => "Login endpoint - coming soon",
            Self::Logout => "Logout endpoint - coming soon",
            Self::ForgotPassword => "Forgot password endpoint - coming soon",
            Self::ResetPassword => "Reset password endpoint - coming soon",
            Self::Me => "Get current user endpoint - coming soon",
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AuthController;

impl AuthController {
    pub fn handle(&self, action: AuthAction, _params: PathParams) -> Result<Reply> {
        Err(Error::NotImplemented(action.pending_message().to_string()))
    }
}
