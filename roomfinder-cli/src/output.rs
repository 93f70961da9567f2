//! Plain-text rendering of results.

use roomfinder_core::booking::PriceSummary;
use roomfinder_core::{
    Booking, PaginatedResponse, PayoutEligibility, PayoutRequest, Property, Review, SupportTicket,
};
use serde::Serialize;

pub fn json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn money(amount: f64, currency: &str) -> String {
    format!("{amount:.0} {currency}")
}

pub fn page_footer<T>(page: &PaginatedResponse<T>) {
    let more = if page.has_more { ", more with --page" } else { "" };
    println!(
        "-- page {} ({} of {} total{more})",
        page.page,
        page.items.len(),
        page.total_count
    );
}

pub fn property_line(p: &Property) {
    let guests = p
        .max_guests
        .map_or_else(String::new, |g| format!(", up to {g} guests"));
    println!(
        "{:<12} {:<40} {:<12} {}/night{guests}",
        p.id,
        p.title,
        p.city,
        money(p.price_per_night, &p.currency)
    );
}

pub fn property_detail(p: &Property, reviews: &[Review]) {
    println!("{} ({:?})", p.title, p.property_type);
    println!("  {}{}", p.city, p.address.as_deref().map_or_else(String::new, |a| format!(", {a}")));
    println!("  {} per night", money(p.price_per_night, &p.currency));
    if let Some(guests) = p.max_guests {
        println!("  up to {guests} guests");
    }
    if !p.is_available {
        println!("  currently not available");
    }
    if let Some(description) = &p.description {
        println!("\n{description}");
    }
    if !p.amenities.is_empty() {
        println!("\nAmenities: {}", p.amenities.join(", "));
    }
    if !reviews.is_empty() {
        println!("\nReviews:");
        for r in reviews {
            let who = r.user_name.as_deref().unwrap_or("guest");
            println!("  {}/5 {who}: {}", r.rating, r.comment);
        }
    }
}

pub fn booking_line(b: &Booking) {
    let total = b
        .total_amount
        .map_or_else(|| "-".to_string(), |t| money(t, &b.currency));
    println!(
        "{:<12} {:<12} {} -> {}  {:?}/{}  {total}",
        b.id, b.property_id, b.check_in, b.check_out, b.status, b.payment_status
    );
}

pub fn price(summary: &PriceSummary) {
    println!(
        "{} night(s) x {} = {}",
        summary.nights,
        money(summary.nightly_price, &summary.currency),
        money(summary.subtotal, &summary.currency)
    );
}

pub fn eligibility(e: &PayoutEligibility) {
    println!("Available: {}", money(e.eligible_amount, &e.currency));
    println!("Locked:    {}", money(e.locked_amount, &e.currency));
    if let Some(min) = e.minimum_amount {
        println!("Minimum:   {}", money(min, &e.currency));
    }
}

pub fn payout_line(p: &PayoutRequest) {
    println!(
        "{:<12} {:>14}  {:?}",
        p.id,
        money(p.amount, &p.currency),
        p.status
    );
}

pub fn ticket_line(t: &SupportTicket) {
    let status = format!("{:?}", t.status);
    let priority = format!("{:?}", t.priority);
    println!("{:<12} {status:<10} {priority:<8} {}", t.id, t.subject);
}

pub fn ticket_detail(t: &SupportTicket) {
    ticket_line(t);
    for m in &t.messages {
        let author = if m.is_staff {
            "support"
        } else {
            m.author_name.as_deref().unwrap_or("you")
        };
        println!("  {author}: {}", m.body);
    }
}
