//! Route names and error-channel headers shared by clients and servers.

use mesh_app::{rpc::RpcStatus, status::StatusClass};

pub(crate) const CODE_HEADER: &str = "x-rpc-code";
pub(crate) const MESSAGE_HEADER: &str = "x-rpc-message";

pub(crate) const USER_SERVICE: &str = "UserService";
pub(crate) const PRODUCT_SERVICE: &str = "ProductService";

pub(crate) const CREATE_USER: &str = "CreateUser";
pub(crate) const GET_USER: &str = "GetUser";
pub(crate) const UPDATE_USER: &str = "UpdateUser";
pub(crate) const DELETE_USER: &str = "DeleteUser";
pub(crate) const LIST_USERS: &str = "ListUsers";

pub(crate) const CREATE_PRODUCT: &str = "CreateProduct";
pub(crate) const GET_PRODUCT: &str = "GetProduct";
pub(crate) const UPDATE_PRODUCT: &str = "UpdateProduct";
pub(crate) const DELETE_PRODUCT: &str = "DeleteProduct";
pub(crate) const LIST_PRODUCTS: &str = "ListProducts";

/// `/rpc/<service>/<method>`
pub(crate) fn path(service: &str, method: &str) -> String {
    format!("/rpc/{service}/{method}")
}

/// Header values carrying `status`. The message is percent-encoded so any
/// text survives as a header value.
pub(crate) fn encode_status(status: &RpcStatus) -> [(&'static str, String); 2] {
    [
        (CODE_HEADER, status.class.code().to_string()),
        (MESSAGE_HEADER, urlencoding::encode(&status.message).into_owned()),
    ]
}

/// Read a raised status back from its header values. No code header means
/// nothing was raised.
pub(crate) fn decode_status(code: Option<&str>, message: Option<&str>) -> Option<RpcStatus> {
    let code = code?.trim().parse::<i32>().unwrap_or_default();
    let message = message
        .map(|message| {
            urlencoding::decode(message)
                .map_or_else(|_ignored| message.to_string(), |decoded| decoded.into_owned())
        })
        .unwrap_or_default();

    Some(RpcStatus {
        class: StatusClass::from_code(code),
        message,
    })
}
