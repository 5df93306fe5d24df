//! Input checks applied to RPC requests before they reach a service.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::rpc::{
    products::{CreateProductRequest, UpdateProductRequest},
    users::{CreateUserRequest, UpdateUserRequest},
};

const MIN_PASSWORD_LENGTH: usize = 6;

#[expect(clippy::expect_used, reason = "the pattern is a literal")]
static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email pattern")
});

#[expect(clippy::expect_used, reason = "the pattern is a literal")]
static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[1-9]\d{1,14}$").expect("valid phone pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("invalid email format")]
    Email,

    #[error("invalid phone format")]
    Phone,

    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters long")]
    PasswordTooShort,

    #[error("price must be greater than zero")]
    PriceNotPositive,

    #[error("{0} cannot be negative")]
    Negative(&'static str),
}

fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }

    Ok(())
}

fn email(value: &str) -> Result<(), ValidationError> {
    required("email", value)?;

    if !EMAIL.is_match(value) {
        return Err(ValidationError::Email);
    }

    Ok(())
}

/// Phone numbers are optional; an empty one passes.
fn phone(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && !PHONE.is_match(value) {
        return Err(ValidationError::Phone);
    }

    Ok(())
}

/// # Errors
///
/// Returns the first rule the request breaks.
pub fn create_user(request: &CreateUserRequest) -> Result<(), ValidationError> {
    required("name", &request.name)?;
    email(&request.email)?;
    required("password", &request.password)?;

    if request.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }

    phone(&request.phone)
}

/// # Errors
///
/// Returns the first rule the request breaks.
pub fn update_user(request: &UpdateUserRequest) -> Result<(), ValidationError> {
    if !request.email.is_empty() {
        email(&request.email)?;
    }

    phone(&request.phone)
}

/// # Errors
///
/// Returns the first rule the request breaks.
pub fn create_product(request: &CreateProductRequest) -> Result<(), ValidationError> {
    required("name", &request.name)?;
    required("category", &request.category)?;
    required("sku", &request.sku)?;

    if request.price <= 0.0 || request.price.is_nan() {
        return Err(ValidationError::PriceNotPositive);
    }

    if request.quantity < 0 {
        return Err(ValidationError::Negative("quantity"));
    }

    Ok(())
}

/// # Errors
///
/// Returns the first rule the request breaks.
pub fn update_product(request: &UpdateProductRequest) -> Result<(), ValidationError> {
    if request.price < 0.0 {
        return Err(ValidationError::Negative("price"));
    }

    if request.quantity < 0 {
        return Err(ValidationError::Negative("quantity"));
    }

    Ok(())
}
