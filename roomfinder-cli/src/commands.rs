//! Subcommand handlers.

use std::sync::Arc;

use anyhow::Context;
use roomfinder_app::AppState;
use roomfinder_core::booking::BOOKINGS_DASHBOARD_ROUTE;
use roomfinder_core::{
    Booking, BookingDraft, BookingObserver, BookingStep, CoreError, CreateTicketRequest,
    PaginationParams, PropertySearchParams,
};

use crate::output;
use crate::{BookArgs, BookingsCommand, Command, PayoutsCommand, SearchArgs, TicketsCommand};

pub async fn run(app: &AppState, command: Command, json: bool) -> anyhow::Result<()> {
    match command {
        Command::Login { email, password } => {
            let user = app.auth_service.sign_in(&email, &password).await?;
            println!("Signed in as {} <{}>", user.full_name, user.email);
        }
        Command::Logout => {
            app.sign_out().await?;
            println!("Signed out");
        }
        Command::Search(args) => search(app, args, json).await?,
        Command::Show { property_id } => {
            let property = app.property_service.get(&property_id).await?;
            let reviews = match app.review_service.list(&property_id).await {
                Ok(reviews) => reviews,
                Err(e) => {
                    tracing::debug!("Reviews unavailable: {e}");
                    Vec::new()
                }
            };
            if json {
                output::json(&property)?;
            } else {
                output::property_detail(&property, &reviews);
            }
        }
        Command::Book(args) => book(app, args, json).await?,
        Command::Bookings { command } => bookings(app, command, json).await?,
        Command::Payouts { command } => payouts(app, command, json).await?,
        Command::Tickets { command } => tickets(app, command, json).await?,
    }
    Ok(())
}

async fn search(app: &AppState, args: SearchArgs, json: bool) -> anyhow::Result<()> {
    let params = PropertySearchParams {
        page: args.page,
        page_size: args.page_size,
        query: args.query,
        city: args.city,
        min_price: args.min_price,
        max_price: args.max_price,
        guests: args.guests,
        property_type: args.property_type.map(Into::into),
    };
    let page = app.property_service.search(&params).await?;
    if json {
        return output::json(&page);
    }
    if page.items.is_empty() {
        println!("No properties match these filters.");
        return Ok(());
    }
    for property in &page.items {
        output::property_line(property);
    }
    output::page_footer(&page);
    Ok(())
}

/// Prints flow progress on stderr.
struct ProgressPrinter;

impl BookingObserver for ProgressPrinter {
    fn on_step(&self, step: BookingStep) {
        if step == BookingStep::Processing {
            eprintln!("Booking created, approve the payment on your phone...");
        }
    }

    fn on_progress(&self, attempt: u32, max_attempts: u32) {
        eprintln!("  waiting for payment confirmation ({attempt}/{max_attempts})");
    }

    fn on_success(&self, booking: &Booking) {
        eprintln!("Payment confirmed for booking {}", booking.id);
    }
}

async fn book(app: &AppState, args: BookArgs, json: bool) -> anyhow::Result<()> {
    let draft = BookingDraft {
        check_in: Some(args.check_in),
        check_out: Some(args.check_out),
        guests: args.guests,
        special_requests: args.requests,
    };
    let mut session = app
        .booking_service
        .start_session(&args.property_id, Some(draft))
        .await?;

    if let Some(summary) = session.price_summary() {
        output::price(&summary);
    }
    session.continue_to_payment()?;
    session.set_payment_provider(args.provider.into())?;
    session.set_phone(args.phone)?;

    let task = app
        .start_booking(session, Arc::new(ProgressPrinter))
        .await?;

    let root = app.cancellation_token().await;
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Stopping payment check...");
            root.cancel();
        }
    });
    let joined = task.join().await;
    interrupt.abort();
    let (session, result) = joined?;

    match result {
        Ok(booking) => {
            if json {
                output::json(&booking)?;
            } else {
                output::booking_line(&booking);
                let route = session.redirect_route().unwrap_or(BOOKINGS_DASHBOARD_ROUTE);
                println!("See it later under {route} or `roomfinder bookings show {}`", booking.id);
            }
            Ok(())
        }
        Err(CoreError::Cancelled) => {
            anyhow::bail!(
                "Payment check stopped. If you approved the payment, run `roomfinder bookings` in a few minutes."
            )
        }
        Err(e) => Err(e.into()),
    }
}

async fn bookings(
    app: &AppState,
    command: Option<BookingsCommand>,
    json: bool,
) -> anyhow::Result<()> {
    match command.unwrap_or(BookingsCommand::List { page: 1 }) {
        BookingsCommand::List { page } => {
            let params = PaginationParams {
                page,
                ..PaginationParams::default()
            };
            let page = app.booking_service.list(&params).await?;
            if json {
                return output::json(&page);
            }
            for booking in &page.items {
                output::booking_line(booking);
            }
            output::page_footer(&page);
        }
        BookingsCommand::Show { booking_id } => {
            let booking = app.booking_service.get(&booking_id).await?;
            if json {
                return output::json(&booking);
            }
            output::booking_line(&booking);
        }
        BookingsCommand::Cancel { booking_id } => {
            let booking = app.booking_service.cancel(&booking_id).await?;
            if json {
                return output::json(&booking);
            }
            output::booking_line(&booking);
        }
        BookingsCommand::Verify { booking_id } => {
            let verification = app.booking_service.verify_payment(&booking_id).await?;
            if json {
                return output::json(&verification);
            }
            println!("Payment {}", verification.payment_status);
        }
    }
    Ok(())
}

async fn payouts(
    app: &AppState,
    command: Option<PayoutsCommand>,
    json: bool,
) -> anyhow::Result<()> {
    match command.unwrap_or(PayoutsCommand::Eligibility) {
        PayoutsCommand::Eligibility => {
            let eligibility = app.payout_service.eligibility().await?;
            if json {
                return output::json(&eligibility);
            }
            output::eligibility(&eligibility);
        }
        PayoutsCommand::List { page } => {
            let params = PaginationParams {
                page,
                ..PaginationParams::default()
            };
            let page = app.payout_service.list(&params).await?;
            if json {
                return output::json(&page);
            }
            for payout in &page.items {
                output::payout_line(payout);
            }
            output::page_footer(&page);
        }
        PayoutsCommand::Request {
            amount,
            provider,
            phone,
        } => {
            let payout = app
                .payout_service
                .request(amount, provider.into(), &phone)
                .await?;
            if json {
                return output::json(&payout);
            }
            output::payout_line(&payout);
        }
    }
    Ok(())
}

async fn tickets(
    app: &AppState,
    command: Option<TicketsCommand>,
    json: bool,
) -> anyhow::Result<()> {
    match command.unwrap_or(TicketsCommand::List { page: 1 }) {
        TicketsCommand::List { page } => {
            let params = PaginationParams {
                page,
                ..PaginationParams::default()
            };
            let page = app.support_service.list(&params).await?;
            if json {
                return output::json(&page);
            }
            for ticket in &page.items {
                output::ticket_line(ticket);
            }
            output::page_footer(&page);
        }
        TicketsCommand::Show { ticket_id } => {
            let ticket = app.support_service.get(&ticket_id).await?;
            if json {
                return output::json(&ticket);
            }
            output::ticket_detail(&ticket);
        }
        TicketsCommand::Create {
            subject,
            message,
            priority,
            category,
            booking_id,
        } => {
            let req = CreateTicketRequest {
                subject,
                category,
                priority: priority.into(),
                message,
                booking_id,
            };
            let ticket = app
                .support_service
                .create(&req)
                .await
                .context("Could not open the ticket")?;
            if json {
                return output::json(&ticket);
            }
            output::ticket_line(&ticket);
        }
        TicketsCommand::Reply { ticket_id, message } => {
            let ticket = app.support_service.reply(&ticket_id, &message).await?;
            if json {
                return output::json(&ticket);
            }
            output::ticket_detail(&ticket);
        }
    }
    Ok(())
}
