//! RPC servers exposing the domain service handlers.

use std::{future::Future, sync::Arc, time::Duration};

use salvo::{
    affix_state::{inject, insert},
    prelude::*,
};
use serde::{Serialize, de::DeserializeOwned};
use tokio::time;
use tracing::warn;

use mesh_app::{
    rpc::{
        Reply, RpcMessage,
        products::{
            CreateProductRequest, DeleteProductRequest, GetProductRequest, ListProductsRequest,
            ProductRpcHandler, UpdateProductRequest,
        },
        users::{
            CreateUserRequest, DeleteUserRequest, GetUserRequest, ListUsersRequest,
            UpdateUserRequest, UserRpcHandler,
        },
    },
    status::StatusClass,
};

use crate::{extensions::*, healthcheck, rpc::wire};

/// A handler and the deadline each of its calls must meet.
#[derive(Debug)]
pub(crate) struct RpcState<H> {
    handler: H,
    deadline: Duration,
}

impl<H> RpcState<H> {
    pub(crate) fn new(handler: H, deadline: Duration) -> Arc<Self> {
        Arc::new(Self { handler, deadline })
    }
}

fn write_reply<T>(res: &mut Response, reply: Reply<T>)
where
    T: Serialize + Send,
{
    if let Some(status) = &reply.status {
        for (name, value) in wire::encode_status(status) {
            if let Err(error) = res.add_header(name, value, true) {
                warn!(header = name, "failed to set rpc status header: {error}");
            }
        }
    }

    res.render(Json(reply.body));
}

/// Decode the request, run `call` under the deadline and write the reply.
async fn serve<H, Req, Resp, F, Fut>(req: &mut Request, depot: &Depot, res: &mut Response, call: F)
where
    H: Clone + Send + Sync + 'static,
    Req: DeserializeOwned,
    Resp: RpcMessage + Serialize + Send,
    F: FnOnce(H, Req) -> Fut,
    Fut: Future<Output = Reply<Resp>>,
{
    let reply = match depot.obtain_or_500::<Arc<RpcState<H>>>() {
        Err(error) => Reply::failed(StatusClass::Internal, error.to_string()),
        Ok(state) => {
            let handler = state.handler.clone();
            let deadline = state.deadline;

            match req.parse_json::<Req>().await {
                Err(error) => Reply::failed(
                    StatusClass::InvalidInput,
                    format!("invalid request body: {error}"),
                ),
                Ok(request) => time::timeout(deadline, call(handler, request))
                    .await
                    .unwrap_or_else(|_elapsed| {
                        Reply::failed(
                            StatusClass::Internal,
                            format!("deadline of {}ms exceeded", deadline.as_millis()),
                        )
                    }),
            }
        }
    };

    write_reply(res, reply);
}

#[handler]
async fn create_user(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    serve(req, depot, res, |handler: UserRpcHandler, request: CreateUserRequest| async move {
        handler.handle_create(request).await
    })
    .await;
}

#[handler]
async fn get_user(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    serve(req, depot, res, |handler: UserRpcHandler, request: GetUserRequest| async move {
        handler.handle_get(request).await
    })
    .await;
}

#[handler]
async fn update_user(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    serve(req, depot, res, |handler: UserRpcHandler, request: UpdateUserRequest| async move {
        handler.handle_update(request).await
    })
    .await;
}

#[handler]
async fn delete_user(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    serve(req, depot, res, |handler: UserRpcHandler, request: DeleteUserRequest| async move {
        handler.handle_delete(request).await
    })
    .await;
}

#[handler]
async fn list_users(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    serve(req, depot, res, |handler: UserRpcHandler, request: ListUsersRequest| async move {
        handler.handle_list(request).await
    })
    .await;
}

#[handler]
async fn create_product(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    serve(
        req,
        depot,
        res,
        |handler: ProductRpcHandler, request: CreateProductRequest| async move {
            handler.handle_create(request).await
        },
    )
    .await;
}

#[handler]
async fn get_product(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    serve(
        req,
        depot,
        res,
        |handler: ProductRpcHandler, request: GetProductRequest| async move {
            handler.handle_get(request).await
        },
    )
    .await;
}

#[handler]
async fn update_product(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    serve(
        req,
        depot,
        res,
        |handler: ProductRpcHandler, request: UpdateProductRequest| async move {
            handler.handle_update(request).await
        },
    )
    .await;
}

#[handler]
async fn delete_product(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    serve(
        req,
        depot,
        res,
        |handler: ProductRpcHandler, request: DeleteProductRequest| async move {
            handler.handle_delete(request).await
        },
    )
    .await;
}

#[handler]
async fn list_products(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    serve(
        req,
        depot,
        res,
        |handler: ProductRpcHandler, request: ListProductsRequest| async move {
            handler.handle_list(request).await
        },
    )
    .await;
}

fn method(name: &str) -> Router {
    Router::with_path(name)
}

/// Routes for the user service.
pub(crate) fn user_router(handler: UserRpcHandler, deadline: Duration) -> Router {
    Router::new()
        .hoop(inject(RpcState::new(handler, deadline)))
        .hoop(insert(healthcheck::SERVICE_NAME_KEY, "user-service"))
        .push(Router::with_path("healthcheck").get(healthcheck::service))
        .push(
            Router::with_path(format!("rpc/{}", wire::USER_SERVICE))
                .push(method(wire::CREATE_USER).post(create_user))
                .push(method(wire::GET_USER).post(get_user))
                .push(method(wire::UPDATE_USER).post(update_user))
                .push(method(wire::DELETE_USER).post(delete_user))
                .push(method(wire::LIST_USERS).post(list_users)),
        )
}

/// Routes for the product service.
pub(crate) fn product_router(handler: ProductRpcHandler, deadline: Duration) -> Router {
    Router::new()
        .hoop(inject(RpcState::new(handler, deadline)))
        .hoop(insert(healthcheck::SERVICE_NAME_KEY, "product-service"))
        .push(Router::with_path("healthcheck").get(healthcheck::service))
        .push(
            Router::with_path(format!("rpc/{}", wire::PRODUCT_SERVICE))
                .push(method(wire::CREATE_PRODUCT).post(create_product))
                .push(method(wire::GET_PRODUCT).post(get_product))
                .push(method(wire::UPDATE_PRODUCT).post(update_product))
                .push(method(wire::DELETE_PRODUCT).post(delete_product))
                .push(method(wire::LIST_PRODUCTS).post(list_products)),
        )
}
