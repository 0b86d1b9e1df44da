// Copyright (c) 2026 Explore Service Contributors
// SPDX-License-Identifier: AGPL-3.0

//! gRPC Server Implementation for the explore service
//! Exposes ListLikedYou, ListNewLikedYou, CountLikedYou, PutDecision

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tonic::{Request, Response, Status};
use tracing::{error, info};

use crate::application::ledger::{LedgerError, LedgerService};
use crate::domain::pagination::LikedYouPage;

// Generated protobuf code
pub mod explore_v1 {
    tonic::include_proto!("explore.v1");
}

use explore_v1::explore_service_server::{ExploreService, ExploreServiceServer};
use explore_v1::list_liked_you_response::Liker as LikerMessage;
use explore_v1::*;

/// Implementation of the ExploreService gRPC service
pub struct ExploreGrpcService {
    ledger: Arc<dyn LedgerService>,
}

impl ExploreGrpcService {
    pub fn new(ledger: Arc<dyn LedgerService>) -> Self {
        Self { ledger }
    }

    /// Create a gRPC server instance
    pub fn into_server(self) -> ExploreServiceServer<Self> {
        ExploreServiceServer::new(self)
    }
}

fn ledger_error_to_status(err: LedgerError) -> Status {
    match &err {
        LedgerError::InvalidToken(_) | LedgerError::InvalidArgument(_) => {
            Status::invalid_argument(err.to_string())
        }
        LedgerError::Timeout { .. } => Status::deadline_exceeded(err.to_string()),
        LedgerError::ConnectivityFailure(_) => Status::unavailable(err.to_string()),
        LedgerError::NotFound(_) => Status::not_found(err.to_string()),
        LedgerError::TransactionFailure(_) | LedgerError::Persistence(_) => {
            error!("Ledger operation failed: {}", err);
            Status::internal(err.to_string())
        }
    }
}

fn page_to_response(page: LikedYouPage) -> ListLikedYouResponse {
    ListLikedYouResponse {
        likers: page
            .likers
            .iter()
            .map(|liker| LikerMessage {
                actor_id: liker.actor_id.to_string(),
                unix_timestamp: liker.unix_timestamp(),
            })
            .collect(),
        next_pagination_token: Some(page.next_pagination_token.unwrap_or_default()),
    }
}

#[tonic::async_trait]
impl ExploreService for ExploreGrpcService {
    async fn list_liked_you(
        &self,
        request: Request<ListLikedYouRequest>,
    ) -> Result<Response<ListLikedYouResponse>, Status> {
        let req = request.into_inner();

        let page = self
            .ledger
            .list_liked_you(
                &req.recipient_user_id,
                req.page_size,
                req.pagination_token.as_deref(),
            )
            .await
            .map_err(ledger_error_to_status)?;

        Ok(Response::new(page_to_response(page)))
    }

    async fn list_new_liked_you(
        &self,
        request: Request<ListLikedYouRequest>,
    ) -> Result<Response<ListLikedYouResponse>, Status> {
        let req = request.into_inner();

        let page = self
            .ledger
            .list_new_liked_you(
                &req.recipient_user_id,
                req.page_size,
                req.pagination_token.as_deref(),
            )
            .await
            .map_err(ledger_error_to_status)?;

        Ok(Response::new(page_to_response(page)))
    }

    async fn count_liked_you(
        &self,
        request: Request<CountLikedYouRequest>,
    ) -> Result<Response<CountLikedYouResponse>, Status> {
        let req = request.into_inner();

        let count = self
            .ledger
            .count_liked_you(&req.recipient_user_id)
            .await
            .map_err(ledger_error_to_status)?;

        Ok(Response::new(CountLikedYouResponse { count }))
    }

    async fn put_decision(
        &self,
        request: Request<PutDecisionRequest>,
    ) -> Result<Response<PutDecisionResponse>, Status> {
        let req = request.into_inner();

        let mutual_likes = self
            .ledger
            .record_decision(&req.actor_user_id, &req.recipient_user_id, req.liked_recipient)
            .await
            .map_err(ledger_error_to_status)?;

        Ok(Response::new(PutDecisionResponse { mutual_likes }))
    }
}

/// Start the gRPC server and run until `shutdown` resolves
pub async fn start_grpc_server<F>(
    addr: SocketAddr,
    ledger: Arc<dyn LedgerService>,
    request_timeout: Duration,
    shutdown: F,
) -> Result<(), tonic::transport::Error>
where
    F: Future<Output = ()> + Send,
{
    let server = ExploreGrpcService::new(ledger).into_server();

    info!("Starting explore gRPC server on {}", addr);

    tonic::transport::Server::builder()
        .timeout(request_timeout)
        .add_service(server)
        .serve_with_shutdown(addr, shutdown)
        .await?;

    info!("explore gRPC server stopped");
    Ok(())
}
