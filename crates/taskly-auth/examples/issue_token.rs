//! Issue or inspect a Taskly session token
//!
//! Usage:
//!   cargo run --example issue_token -- --secret "your-secret-key" --user-id <uuid>
//!   cargo run --example issue_token -- --secret "your-secret-key" --verify <token>

use chrono::{DateTime, Local, Utc};
use clap::Parser;
use taskly_auth::TokenCodec;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "issue_token")]
#[command(about = "Issue or inspect a Taskly session token", long_about = None)]
struct Args {
    /// JWT secret (must match the server's secret)
    #[arg(long, env = "JWT_SECRET")]
    secret: String,

    /// User ID to put in the token (random if omitted)
    #[arg(long)]
    user_id: Option<Uuid>,

    /// Verify this token instead of issuing one
    #[arg(long)]
    verify: Option<String>,
}

fn main() {
    let args = Args::parse();
    let codec = TokenCodec::new(args.secret.as_bytes());

    if let Some(token) = args.verify {
        match codec.verify(&token) {
            Ok(claims) => {
                let expires: DateTime<Local> = DateTime::<Utc>::from_timestamp(claims.exp, 0)
                    .unwrap_or_else(Utc::now)
                    .into();
                println!("Subject: {}", claims.sub);
                println!("Expires: {}", expires.format("%Y-%m-%d %H:%M:%S %Z"));
            }
            Err(e) => {
                eprintln!("Token rejected: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let user_id = args.user_id.unwrap_or_else(Uuid::new_v4);
    match codec.issue(&user_id) {
        Ok(token) => {
            println!("User ID: {}", user_id);
            println!("Valid for: {} days", codec.validity().num_days());
            println!("\nToken:\n{}\n", token);
            println!("Usage:");
            println!("  curl -H \"Authorization: Bearer {}\" ...", token);
        }
        Err(e) => {
            eprintln!("Failed to issue token: {}", e);
            std::process::exit(1);
        }
    }
}
