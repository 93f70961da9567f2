//! Support tickets

use std::sync::Arc;

use roomfinder_backend::{
    Capability, CreateTicketRequest, PaginatedResponse, PaginationParams, SupportTicket,
    TicketStatus,
};

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::traits::Notifier;
use crate::validation;

/// Support service
pub struct SupportService {
    ctx: Arc<ServiceContext>,
}

impl SupportService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    pub async fn create(&self, req: &CreateTicketRequest) -> CoreResult<SupportTicket> {
        validation::validate_ticket(req)?;
        self.ctx.require_user().await?;
        let ticket = self
            .ctx
            .call(Capability::Support, |b| async move { b.create_ticket(req).await })
            .await?;
        log::info!("Support ticket {} opened", ticket.id);
        self.ctx
            .notifier
            .success("Ticket created. Our team will get back to you.");
        Ok(ticket)
    }

    pub async fn list(
        &self,
        params: &PaginationParams,
    ) -> CoreResult<PaginatedResponse<SupportTicket>> {
        self.ctx.require_user().await?;
        let params = params.validated(100);
        self.ctx
            .call(Capability::Support, |b| async move {
                b.list_tickets(&params).await
            })
            .await
    }

    pub async fn get(&self, ticket_id: &str) -> CoreResult<SupportTicket> {
        self.ctx.require_user().await?;
        self.ctx
            .call(Capability::Support, |b| async move {
                b.get_ticket(ticket_id).await
            })
            .await
    }

    pub async fn reply(&self, ticket_id: &str, message: &str) -> CoreResult<SupportTicket> {
        validation::validate_reply(message)?;
        self.ctx.require_user().await?;
        let message = message.trim();
        self.ctx
            .call(Capability::Support, |b| async move {
                b.reply_to_ticket(ticket_id, message).await
            })
            .await
    }

    /// Staff only; the server enforces the role.
    pub async fn update_status(
        &self,
        ticket_id: &str,
        status: TicketStatus,
    ) -> CoreResult<SupportTicket> {
        self.ctx.require_user().await?;
        let ticket = self
            .ctx
            .call(Capability::Support, |b| async move {
                b.update_ticket_status(ticket_id, status).await
            })
            .await?;
        log::info!("Ticket {ticket_id} now {status:?}");
        Ok(ticket)
    }
}
