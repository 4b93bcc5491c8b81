use anyhow::Context;
use dialoguer::{Confirm, Password};

use arena::flows::access::AccessGate;
use arena::flows::approval::ApprovalQueue;
use arena::flows::booking_request::BookingRequest;
use arena::flows::catalog::{BookNow, CourtCatalog};
use arena::flows::checkout::Checkout;
use arena::flows::confirmation::MemberBookings;
use arena::flows::manage::{self, AnnouncementForm, CouponForm, CourtForm, UserDirectory};
use arena::models::Availability;
use arena::services::auth::{FederatedCredential, ProfileUpdate};
use arena::services::payment::BillingDetails;
use arena::state::AppState;

use crate::cli::Command;

pub async fn run(command: Command, state: &AppState) -> anyhow::Result<()> {
    let api = &state.api;
    match command {
        Command::Register { email, password } => {
            let password = password_or_prompt(password)?;
            let session = state.register(&email, &password).await?;
            println!("Welcome, {}!", session.email);
        }
        Command::Login { email, password } => {
            let password = password_or_prompt(password)?;
            let session = state.sign_in(&email, &password).await?;
            println!("Signed in as {}", session.email);
        }
        Command::LoginGoogle { id_token } => {
            let session = state
                .sign_in_with_provider(&FederatedCredential::google(id_token))
                .await?;
            println!("Signed in as {}", session.email);
        }
        Command::Logout => {
            state.sign_out().await?;
            println!("Signed out");
        }
        Command::Whoami => {
            let session = state.session.current();
            let mut gate = AccessGate::new();
            gate.resolve(api, session.as_ref()).await?;
            match (session, gate.role()) {
                (Some(session), Some(role)) => {
                    println!("{} ({role})", session.email);
                    for route in gate.nav_items() {
                        println!("  - {}", route.label());
                    }
                }
                _ => println!("Not signed in"),
            }
        }
        Command::Profile { name, photo } => {
            let update = ProfileUpdate {
                display_name: name,
                photo_url: photo,
            };
            state.update_profile(&update).await?;
            println!("Profile updated");
        }
        Command::Courts {
            search,
            location,
            sort,
            page,
        } => {
            let mut catalog = CourtCatalog::load(api, state.config.page_size).await?;
            catalog.set_search(&search);
            catalog.set_location(location.as_deref());
            if let Some(sort) = sort {
                catalog.set_order(sort.into());
            }
            if !catalog.go_to_page(page) {
                anyhow::bail!("page {page} does not exist (of {})", catalog.page_count());
            }
            for court in catalog.page_items() {
                println!(
                    "{:<24} {:<20} {:<12} {:>8.2}/h  {}",
                    court.id, court.name, court.kind, court.rate, court.location
                );
            }
            println!("page {} of {}", catalog.page(), catalog.page_count());
        }
        Command::Book {
            court_id,
            date,
            slots,
        } => {
            let catalog = CourtCatalog::load(api, state.config.page_size).await?;
            let session = state.session.current();
            let court = match catalog.book_now(&court_id, session.as_ref())? {
                BookNow::Open(court) => court,
                BookNow::RedirectToLogin => anyhow::bail!("Please sign in to book a court"),
            };
            let session = state.require_session()?;
            let mut flow = BookingRequest::mount(api, &session).await?;
            flow.open(court);
            flow.set_date(date);
            flow.set_slots(slots);
            let booking = flow.submit(api).await?;
            println!(
                "Requested {} slot(s) on {} for {:.2} (booking {}, {})",
                booking.slots, booking.date, booking.total_price, booking.id, booking.status
            );
        }
        Command::MyBookings => {
            let session = state.require_session()?;
            let (bookings, courts) =
                tokio::try_join!(api.bookings_for(&session.email), api.courts())?;
            for b in &bookings {
                println!(
                    "{:<24} {:<20} {} {} slot(s) {:>8.2} {}",
                    b.id,
                    arena::flows::court_name(&courts, &b.court_id),
                    b.date,
                    b.slots,
                    b.total_price,
                    b.status
                );
            }
        }
        Command::Pending { page, width } => {
            let mut queue = ApprovalQueue::mount(api, width).await?;
            if !queue.go_to_page(page) {
                anyhow::bail!("page {page} does not exist (of {})", queue.page_count());
            }
            for row in queue.rows() {
                println!(
                    "{:<24} {:<20} {} {} slot(s) {:>8.2} {}",
                    row.booking.id,
                    row.court_name,
                    row.booking.date,
                    row.booking.slots,
                    row.booking.total_price,
                    row.booking.user_email
                );
            }
            println!("page {} of {}", queue.page(), queue.page_count());
        }
        Command::Approve { booking_id, yes } => {
            let mut queue = ApprovalQueue::mount(api, 1024).await?;
            queue.request_approve(&booking_id)?;
            if !confirm(yes, &format!("Approve booking {booking_id}?"))? {
                queue.dismiss();
                return Ok(());
            }
            queue.confirm(api).await?;
            println!("Booking {booking_id} approved");
        }
        Command::Reject { booking_id, yes } => {
            let mut queue = ApprovalQueue::mount(api, 1024).await?;
            queue.request_reject(&booking_id)?;
            if !confirm(yes, &format!("Reject and delete booking {booking_id}?"))? {
                queue.dismiss();
                return Ok(());
            }
            queue.confirm(api).await?;
            println!("Booking {booking_id} rejected");
        }
        Command::Approved => {
            let session = state.require_session()?;
            let view = MemberBookings::mount(api, &session).await?;
            for row in view.rows() {
                println!(
                    "{:<24} {:<20} {:<16} {} {} slot(s) {:>8.2}",
                    row.booking.id,
                    row.court_name,
                    row.location,
                    row.booking.date,
                    row.booking.slots,
                    row.booking.total_price
                );
            }
        }
        Command::Cancel { booking_id, yes } => {
            let session = state.require_session()?;
            let mut view = MemberBookings::mount(api, &session).await?;
            view.request_cancel(&booking_id)?;
            if !confirm(yes, &format!("Cancel booking {booking_id}?"))? {
                view.dismiss();
                return Ok(());
            }
            view.confirm_cancel(api).await?;
            println!("Booking {booking_id} cancelled");
        }
        Command::Pay {
            booking_id,
            coupon,
            payment_method,
            name,
        } => {
            let session = state.require_session()?;
            let mut checkout = Checkout::load(api, &booking_id).await?;
            if let Some(code) = coupon {
                checkout.apply_coupon(api, &code).await?;
            }
            println!(
                "{}: {:.2} (was {:.2})",
                checkout.court_name(),
                checkout.final_price(),
                checkout.original_price()
            );
            let billing = BillingDetails {
                name: name
                    .or_else(|| session.display_name.clone())
                    .unwrap_or_else(|| session.email.clone()),
                email: session.email.clone(),
            };
            let payment = checkout
                .pay(api, state.payments.as_ref(), &payment_method, &billing)
                .await?;
            println!(
                "Paid {:.2}, transaction {}",
                payment.price, payment.transaction_id
            );
        }
        Command::Payments => {
            let session = state.require_session()?;
            for p in api.payments_for(&session.email).await? {
                println!(
                    "{} {:<20} {} {:>8.2} (discount {:.2}) {}",
                    p.paid_at.format("%Y-%m-%d"),
                    p.court_name,
                    p.date,
                    p.price,
                    p.discount_applied,
                    p.transaction_id
                );
            }
        }
        Command::Announcements => {
            for a in api.announcements().await? {
                println!("[{}] {}\n  {}", a.created_at.format("%Y-%m-%d"), a.title, a.content);
            }
        }
        Command::Coupons => {
            for c in api.coupons().await? {
                println!("{:<12} {:>8.2} off  {}", c.code, c.discount_amount, c.title);
            }
        }
        Command::Overview => {
            let o = api.overview().await?;
            println!(
                "courts: {}  users: {}  members: {}  bookings: {}",
                o.total_courts, o.total_users, o.total_members, o.total_bookings
            );
        }
        Command::CourtAdd {
            name,
            kind,
            location,
            price,
            capacity,
            availability,
            description,
            amenities,
            image,
        } => {
            let form = CourtForm {
                name,
                kind,
                location,
                rate: Some(price),
                capacity: Some(capacity),
                availability: Some(Availability::Slots(availability)),
                description,
                amenities,
                image,
            };
            let id = manage::add_court(api, &form).await?;
            println!("Court {id} added");
        }
        Command::CourtDelete { court_id, yes } => {
            if confirm(yes, &format!("Delete court {court_id}?"))? {
                manage::remove_court(api, &court_id).await?;
                println!("Court {court_id} deleted");
            }
        }
        Command::CouponAdd {
            code,
            title,
            description,
            discount,
        } => {
            let form = CouponForm {
                code,
                title,
                description,
                discount_amount: Some(discount),
            };
            let id = manage::add_coupon(api, &form).await?;
            println!("Coupon {id} added");
        }
        Command::CouponDelete { coupon_id, yes } => {
            if confirm(yes, &format!("Delete coupon {coupon_id}?"))? {
                manage::remove_coupon(api, &coupon_id).await?;
                println!("Coupon {coupon_id} deleted");
            }
        }
        Command::Announce { title, content } => {
            let id = manage::publish_announcement(api, &AnnouncementForm { title, content }).await?;
            println!("Announcement {id} published");
        }
        Command::Users { search, members } => {
            let mut directory = UserDirectory::mount(api).await?;
            directory.set_search(&search);
            let accounts = if members {
                directory.members()
            } else {
                directory.filtered()
            };
            for a in accounts {
                println!("{:<32} {:<20} {}", a.email, a.name, a.role);
            }
        }
        Command::SetRole { email, role } => {
            let mut directory = UserDirectory::mount(api).await?;
            directory.set_role(api, &email, role.into()).await?;
            println!("{email} is now {}", arena::models::Role::from(role));
        }
    }
    Ok(())
}

fn password_or_prompt(password: Option<String>) -> anyhow::Result<String> {
    match password {
        Some(p) => Ok(p),
        None => Password::new()
            .with_prompt("Password")
            .interact()
            .context("failed to read password"),
    }
}

fn confirm(assume_yes: bool, prompt: &str) -> anyhow::Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .context("failed to read confirmation")
}
