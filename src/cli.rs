use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use arena::flows::catalog::PriceOrder;
use arena::models::Role;

#[derive(Debug, Parser)]
#[command(name = "arena", version, about = "Elite Arena court booking client")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Asc,
    Desc,
}

impl From<SortArg> for PriceOrder {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Asc => PriceOrder::Ascending,
            SortArg::Desc => PriceOrder::Descending,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoleArg {
    User,
    Member,
    Admin,
}

impl From<RoleArg> for Role {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::User => Role::User,
            RoleArg::Member => Role::Member,
            RoleArg::Admin => Role::Admin,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an account with email and password
    Register {
        email: String,
        #[arg(long, env = "ARENA_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign in with email and password
    Login {
        email: String,
        #[arg(long, env = "ARENA_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign in with a Google ID token
    LoginGoogle {
        #[arg(long, env = "GOOGLE_ID_TOKEN", hide_env_values = true)]
        id_token: String,
    },
    /// Sign out and forget the stored token
    Logout,
    /// Show the signed-in account, its role and dashboard entries
    Whoami,
    /// Update display name or photo
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        photo: Option<String>,
    },
    /// Browse courts
    Courts {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        location: Option<String>,
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Request a court booking
    Book {
        court_id: String,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long, default_value_t = 1)]
        slots: u32,
    },
    /// Your bookings of every status
    MyBookings,
    /// Booking requests awaiting a decision (admin)
    Pending {
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Terminal width in pixels used to pick the page size
        #[arg(long, default_value_t = 1024)]
        width: u32,
    },
    /// Approve a pending booking (admin)
    Approve {
        booking_id: String,
        #[arg(long)]
        yes: bool,
    },
    /// Reject and delete a pending booking (admin)
    Reject {
        booking_id: String,
        #[arg(long)]
        yes: bool,
    },
    /// Your approved bookings awaiting payment (member)
    Approved,
    /// Cancel an approved booking before paying (member)
    Cancel {
        booking_id: String,
        #[arg(long)]
        yes: bool,
    },
    /// Pay for an approved booking (member)
    Pay {
        booking_id: String,
        #[arg(long)]
        coupon: Option<String>,
        /// Tokenised card, e.g. a Stripe `pm_...` id
        #[arg(long)]
        payment_method: String,
        /// Cardholder name
        #[arg(long)]
        name: Option<String>,
    },
    /// Your payment history (member)
    Payments,
    /// Club announcements
    Announcements,
    /// Available coupons
    Coupons,
    /// Aggregate counts (admin)
    Overview,
    /// Add a court (admin)
    CourtAdd {
        #[arg(long)]
        name: String,
        #[arg(long = "type")]
        kind: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        price: f64,
        #[arg(long, default_value_t = 0)]
        capacity: u32,
        #[arg(long)]
        availability: u32,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long = "amenity")]
        amenities: Vec<String>,
        #[arg(long, default_value = "")]
        image: String,
    },
    /// Delete a court (admin)
    CourtDelete {
        court_id: String,
        #[arg(long)]
        yes: bool,
    },
    /// Add a coupon (admin)
    CouponAdd {
        #[arg(long)]
        code: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        discount: f64,
    },
    /// Delete a coupon (admin)
    CouponDelete {
        coupon_id: String,
        #[arg(long)]
        yes: bool,
    },
    /// Publish an announcement (admin)
    Announce {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    /// List accounts (admin)
    Users {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        members: bool,
    },
    /// Change an account's role (admin)
    SetRole {
        email: String,
        #[arg(value_enum)]
        role: RoleArg,
    },
}
