//! Interactive shell: the command surface in front of the API/session layer.
//!
//! The HTTP client's cookie jar and the session state live until the shell
//! exits. Commands are read line by line and each one is awaited to
//! completion before the next is read.

use std::io::{self, BufRead, Write as _};

use anyhow::Result;
use chrono::NaiveDate;
use driveshare_core::api::DriveShareClient;
use driveshare_core::api::types::{
    AvailabilityRange, AvailabilitySearch, BookingReply, BookingRole, BookingStatus, Credentials,
    Listing, NewBooking, NewListing, Registration, SecurityQuestion,
};
use driveshare_core::api::{INCOMPLETE_REGISTRATION, SECURITY_QUESTION_PROMPTS};
use driveshare_core::client::{ClientError, ClientErrorKind, WriteOutcome};
use driveshare_core::session::SessionState;
use tokio::runtime::Runtime;

const HELP: &str = "\
commands:
  login <email> <password>        authenticate against the backend
  logout                          drop the session
  register <email> <password> <answer1> <answer2> <answer3>
                                  create an account (answers to the three
                                  security questions, in order)
  search <city> <from> <to>       find cars available in a date range
  book <listing-id> <from> <to>   request a booking
  list-car <model> <year> <mileage> <city> <price> [<from>:<to> ...]
                                  put a car up for rental
  my-cars                         show your own listings
  bookings                        show booking requests involving you
  accept <booking-id>             accept a pending request
  reject <booking-id>             reject a pending request
  cancel <booking-id>             cancel a confirmed booking
  message <owner-id>              start a conversation with a car owner
  conversations                   list known conversations
  select <conversation-id>        choose the active conversation
  messages                        show messages of the active conversation
  help                            this text
  quit                            leave the shell

dates are YYYY-MM-DD";

enum Flow {
    Continue,
    Quit,
}

pub struct Shell {
    api: DriveShareClient,
    session: SessionState,
}

impl Shell {
    pub fn new(api: DriveShareClient, session: SessionState) -> Self {
        Self { api, session }
    }

    /// Reads commands from stdin until EOF or `quit`.
    ///
    /// # Errors
    /// Returns an error only when stdin or stdout fail; command-level
    /// problems are reported as feedback lines and the loop continues.
    pub fn run(&mut self, runtime: &Runtime) -> Result<()> {
        println!("DriveShare shell. Type 'help' for commands.");
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        loop {
            print!("driveshare> ");
            io::stdout().flush()?;
            let Some(line) = lines.next() else { break };
            let line = line?;
            match self.dispatch(runtime, line.trim()) {
                Flow::Quit => break,
                Flow::Continue => {}
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, runtime: &Runtime, line: &str) -> Flow {
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            return Flow::Continue;
        };
        let args: Vec<&str> = parts.collect();

        match command {
            "help" => println!("{HELP}"),
            "quit" | "exit" => return Flow::Quit,
            "login" => self.login(runtime, &args),
            "logout" => {
                self.session.logout();
                println!("logged out");
            }
            "register" => self.register(runtime, &args),
            "search" => self.search(runtime, &args),
            "book" => self.book(runtime, &args),
            "list-car" => self.list_car(runtime, &args),
            "my-cars" => self.my_cars(runtime),
            "bookings" => self.bookings(runtime),
            "accept" => self.respond(runtime, &args, BookingReply::Accept),
            "reject" => self.respond(runtime, &args, BookingReply::Reject),
            "cancel" => self.cancel(runtime, &args),
            "message" => self.message(runtime, &args),
            "conversations" => self.conversations(),
            "select" => self.select(&args),
            "messages" => self.messages(),
            other => println!("unknown command: {other} (try 'help')"),
        }
        Flow::Continue
    }

    fn login(&mut self, runtime: &Runtime, args: &[&str]) {
        let &[email, password] = args else {
            println!("usage: login <email> <password>");
            return;
        };
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        match runtime.block_on(self.api.login(&credentials)) {
            Ok(WriteOutcome::Success(_)) => {
                self.session.login();
                println!("logged in as {email}");
            }
            Ok(WriteOutcome::HttpError(rejection)) => {
                println!("Login failed. Please try again. ({rejection})");
            }
            Err(err) => report_transport("login", &err),
        }
    }

    fn register(&mut self, runtime: &Runtime, args: &[&str]) {
        let &[email, password, a1, a2, a3] = args else {
            println!("usage: register <email> <password> <answer1> <answer2> <answer3>");
            return;
        };
        let registration = Registration {
            email: email.to_string(),
            password: password.to_string(),
            security_questions: SECURITY_QUESTION_PROMPTS
                .iter()
                .zip([a1, a2, a3])
                .map(|(question, answer)| SecurityQuestion {
                    question: (*question).to_string(),
                    answer: answer.to_string(),
                })
                .collect(),
        };
        match runtime.block_on(self.api.register(&registration)) {
            Ok(WriteOutcome::Success(_)) => println!("Registration successful!"),
            Ok(WriteOutcome::HttpError(_)) => println!("Registration failed. Please try again."),
            Err(ClientError {
                kind: ClientErrorKind::Validation,
                ..
            }) => println!("{INCOMPLETE_REGISTRATION}"),
            Err(err) => report_transport("register", &err),
        }
    }

    fn search(&mut self, runtime: &Runtime, args: &[&str]) {
        let &[city, from, to] = args else {
            println!("usage: search <city> <from> <to>");
            return;
        };
        let (Some(from_date), Some(to_date)) = (parse_date(from), parse_date(to)) else {
            println!("dates must be YYYY-MM-DD");
            return;
        };
        let query = AvailabilitySearch {
            pickup_location: city.to_string(),
            from_date,
            to_date,
        };
        match runtime.block_on(self.api.search_available_cars(&query)) {
            Ok(WriteOutcome::Success(listings)) => {
                if listings.is_empty() {
                    println!("no cars available in {city} for those dates");
                } else {
                    for listing in &listings {
                        print_listing(listing);
                    }
                }
            }
            Ok(WriteOutcome::HttpError(rejection)) => println!("search failed ({rejection})"),
            Err(err) => report_transport("search", &err),
        }
    }

    fn book(&mut self, runtime: &Runtime, args: &[&str]) {
        let &[listing, from, to] = args else {
            println!("usage: book <listing-id> <from> <to>");
            return;
        };
        let Some(listing_id) = parse_id(listing) else {
            println!("listing id must be a number");
            return;
        };
        let (Some(start_date), Some(end_date)) = (parse_date(from), parse_date(to)) else {
            println!("dates must be YYYY-MM-DD");
            return;
        };
        let booking = NewBooking {
            listing_id,
            start_date,
            end_date,
        };
        match runtime.block_on(self.api.create_booking(&booking)) {
            Ok(WriteOutcome::Success(receipt)) => {
                println!("booking {} created ({})", receipt.request_id, receipt.status);
            }
            Ok(WriteOutcome::HttpError(rejection)) => println!("booking failed ({rejection})"),
            Err(err) => report_transport("book", &err),
        }
    }

    fn list_car(&mut self, runtime: &Runtime, args: &[&str]) {
        let [model, year, mileage, city, price, ranges @ ..] = args else {
            println!("usage: list-car <model> <year> <mileage> <city> <price> [<from>:<to> ...]");
            return;
        };
        let (Ok(year), Ok(mileage), Ok(price)) =
            (year.parse::<i32>(), mileage.parse::<i64>(), price.parse::<f64>())
        else {
            println!("year, mileage and price must be numbers");
            return;
        };
        let mut availability = Vec::with_capacity(ranges.len());
        for range in ranges {
            let Some(parsed) = parse_range(range) else {
                println!("availability ranges must be <from>:<to> with YYYY-MM-DD dates");
                return;
            };
            availability.push(parsed);
        }
        let listing = NewListing {
            model: (*model).to_string(),
            year,
            mileage,
            pickup_location: (*city).to_string(),
            rental_pricing: price,
            availability,
        };
        match runtime.block_on(self.api.create_listing(&listing)) {
            Ok(WriteOutcome::Success(created)) => {
                println!("listing {} created", created.listing_id);
            }
            Ok(WriteOutcome::HttpError(rejection)) => println!("listing failed ({rejection})"),
            Err(err) => report_transport("list-car", &err),
        }
    }

    fn my_cars(&mut self, runtime: &Runtime) {
        match runtime.block_on(self.api.my_cars()) {
            Ok(response) => match response.data {
                Some(cars) if cars.is_empty() => println!("you have no listings"),
                Some(cars) => {
                    for car in &cars {
                        print_listing(car);
                    }
                }
                None => println!("could not fetch cars (HTTP {})", response.status),
            },
            Err(err) => report_transport("my-cars", &err),
        }
    }

    fn bookings(&mut self, runtime: &Runtime) {
        if !self.session.is_authenticated() {
            println!("note: not logged in; the server may reject this");
        }
        match runtime.block_on(self.api.fetch_bookings()) {
            Ok(response) => match response.data {
                Some(bookings) if bookings.is_empty() => println!("No bookings found."),
                Some(bookings) => {
                    for booking in &bookings {
                        println!(
                            "booking {}: {} {} to {} ({})",
                            booking.request_id,
                            booking.status,
                            booking.start_date,
                            booking.end_date,
                            booking.role,
                        );
                        if booking.awaits_decision() {
                            println!(
                                "  -> accept {0} | reject {0}",
                                booking.request_id
                            );
                        }
                        if booking.status == BookingStatus::Confirmed {
                            println!("  -> cancel {}", booking.request_id);
                            if booking.role == BookingRole::Requester {
                                println!("  please pay if you have not done so!");
                            }
                        }
                    }
                }
                None => println!("could not fetch bookings (HTTP {})", response.status),
            },
            Err(err) => report_transport("bookings", &err),
        }
    }

    fn respond(&mut self, runtime: &Runtime, args: &[&str], reply: BookingReply) {
        let verb = match reply {
            BookingReply::Accept => "accept",
            BookingReply::Reject => "reject",
        };
        let &[id] = args else {
            println!("usage: {verb} <booking-id>");
            return;
        };
        let Some(booking_id) = parse_id(id) else {
            println!("booking id must be a number");
            return;
        };
        match runtime.block_on(self.api.respond_to_booking(booking_id, reply)) {
            Ok(WriteOutcome::Success(_)) => println!("booking {booking_id} {verb}ed"),
            Ok(WriteOutcome::HttpError(rejection)) => {
                println!("could not {verb} booking {booking_id} ({rejection})");
            }
            Err(err) => report_transport(verb, &err),
        }
    }

    fn cancel(&mut self, runtime: &Runtime, args: &[&str]) {
        let &[id] = args else {
            println!("usage: cancel <booking-id>");
            return;
        };
        let Some(booking_id) = parse_id(id) else {
            println!("booking id must be a number");
            return;
        };
        match runtime.block_on(self.api.cancel_booking(booking_id)) {
            Ok(WriteOutcome::Success(_)) => println!("booking {booking_id} canceled"),
            Ok(WriteOutcome::HttpError(rejection)) => {
                println!("could not cancel booking {booking_id} ({rejection})");
            }
            Err(err) => report_transport("cancel", &err),
        }
    }

    fn message(&mut self, runtime: &Runtime, args: &[&str]) {
        let &[owner] = args else {
            println!("usage: message <owner-id>");
            return;
        };
        let Some(owner_id) = parse_id(owner) else {
            println!("owner id must be a number");
            return;
        };
        match runtime.block_on(self.api.start_conversation(owner_id)) {
            Ok(WriteOutcome::Success(conversation)) => {
                self.session.record_conversation(conversation);
                self.session.select_conversation(conversation.id);
                println!("conversation {} started", conversation.id);
            }
            Ok(WriteOutcome::HttpError(rejection)) => {
                println!("could not start conversation ({rejection})");
            }
            Err(err) => report_transport("message", &err),
        }
    }

    fn conversations(&self) {
        let conversations = self.session.conversations();
        if conversations.is_empty() {
            println!("no conversations yet");
            return;
        }
        for conversation in conversations {
            println!("conversation {}", conversation.id);
        }
    }

    fn select(&mut self, args: &[&str]) {
        let &[id] = args else {
            println!("usage: select <conversation-id>");
            return;
        };
        let Some(conversation_id) = parse_id(id) else {
            println!("conversation id must be a number");
            return;
        };
        self.session.select_conversation(conversation_id);
        println!("conversation {conversation_id} selected");
    }

    fn messages(&self) {
        if self.session.active_conversation().is_none() {
            println!("Select a conversation to view messages");
            return;
        }
        let messages = self.session.current_messages();
        if messages.is_empty() {
            println!("(no messages)");
            return;
        }
        for message in messages {
            println!("{}", message.content);
        }
    }
}

fn report_transport(command: &str, err: &ClientError) {
    println!("{command} error: {err}");
}

fn print_listing(listing: &Listing) {
    println!("#{} {} {}", listing.listing_id, listing.year, listing.model);
    println!(
        "    class: {}",
        listing.class.as_deref().unwrap_or("not specified")
    );
    println!("    mileage: {} miles", listing.mileage);
    println!("    pickup: {}", listing.pickup_location);
    println!("    price/day: ${:.2}", listing.rental_pricing);
    for range in &listing.availability {
        println!("    available {} to {}", range.start_date, range.end_date);
    }
    if let Some(owner_id) = listing.owner_id {
        println!("    owner: {owner_id} (message {owner_id} to get in touch)");
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    value.parse().ok()
}

fn parse_id(value: &str) -> Option<i64> {
    value.parse().ok()
}

fn parse_range(token: &str) -> Option<AvailabilityRange> {
    let (from, to) = token.split_once(':')?;
    Some(AvailabilityRange {
        start_date: parse_date(from)?,
        end_date: parse_date(to)?,
    })
}
