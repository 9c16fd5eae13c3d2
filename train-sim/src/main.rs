use std::io::{self, Write};
use std::path::Path;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use logger::{Color, Logger};
use store::{
    KeyValueStore, NewUser, Passenger, PaymentStatus, SessionManager, TicketDraft, TicketStore,
};
use train_sim::types::alert::{setup_alert, AlertSession};
use train_sim::types::notify::{ConsoleNotifier, Notifier};
use train_sim::types::registry::Registry;
use train_sim::types::sim_error::SimError;
use train_sim::types::tracker::{Tracker, TrackingSession};
use train_sim::types::train::Train;
use train_sim::types::STEP_INTERVAL_MILLIS;

struct App {
    registry: Registry,
    tickets: TicketStore,
    sessions: SessionManager,
    notifier: Arc<ConsoleNotifier>,
    logger: Logger,
    tracker: Option<Tracker>,
    tracking: Option<TrackingSession>,
    alert: Option<AlertSession>,
}

fn clean_scr() {
    print!("\x1B[2J\x1B[1;1H");
    io::stdout().flush().unwrap();
}

fn prompt_input(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().unwrap();
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .expect("Failed to read input");
    input.trim().to_string()
}

fn prompt_optional(prompt: &str) -> Option<String> {
    let input = prompt_input(prompt);
    if input.is_empty() {
        None
    } else {
        Some(input)
    }
}

fn search_trains(app: &App) -> Result<(), SimError> {
    clean_scr();
    println!("Leave any filter empty to skip it.");
    let source = prompt_optional("Source station (name or code): ");
    let destination = prompt_optional("Destination station (name or code): ");
    let name = prompt_optional("Train name: ");
    let number = prompt_optional("Train number: ");

    println!("\nSearching...");
    thread::sleep(Duration::from_secs(1));

    let results = app.registry.search(
        source.as_deref(),
        destination.as_deref(),
        name.as_deref(),
        number.as_deref(),
    );

    if results.is_empty() {
        println!("No trains matched your search.");
        return Ok(());
    }

    println!(
        "\n{:<8} {:<22} {:<28} {:<28} {:<10}",
        "Number", "Name", "Source", "Destination", "Duration"
    );
    for train in results {
        println!(
            "{:<8} {:<22} {:<28} {:<28} {:<10}",
            train.number, train.name, train.source.name, train.destination.name, train.duration
        );
    }
    Ok(())
}

fn find_train(app: &App) -> Result<(), SimError> {
    let number = prompt_input("Enter the train number: ");
    let train = lookup_train(&app.registry, &number)?;

    println!("\n{} - {}", train.number, train.name);
    println!(
        "{} ({}) -> {} ({})",
        train.source.name, train.source.code, train.destination.name, train.destination.code
    );
    println!(
        "Departs {}  Arrives {}  Duration {}",
        train.departure_time.format("%H:%M"),
        train.arrival_time.format("%H:%M"),
        train.duration
    );
    println!("Stops:");
    for station in train.route_stations() {
        println!("  {} ({})", station.name, station.code);
    }
    Ok(())
}

fn track(app: &mut App) -> Result<(), SimError> {
    let number = prompt_input("Enter the train number to track: ");
    let train = lookup_train(&app.registry, &number)?;

    println!("Loading route...");
    thread::sleep(Duration::from_secs(1));

    let tracker = Tracker::new(train);
    println!(
        "Route loaded for train {} ({} points). Use 'start-tracking' to begin.",
        train.number,
        tracker.route().len()
    );
    app.tracker = Some(tracker);
    Ok(())
}

fn start_tracking(app: &mut App) -> Result<(), SimError> {
    if app.tracking.as_ref().is_some_and(|s| s.is_running()) {
        println!("Tracking is already running. Use 'live' to watch it.");
        return Ok(());
    }

    let tracker = app.tracker.take().ok_or(SimError::NoTrainSelected)?;
    let train_number = tracker.train_number().to_string();

    let step_logger = app.logger.clone();
    let session = TrackingSession::start(tracker, move |position, remaining_secs| {
        step_logger
            .info(
                &format!(
                    "Train {} at ({:.4}, {:.4}), {}s to destination",
                    train_number, position.lat, position.lng, remaining_secs
                ),
                Color::Green,
                false,
            )
            .ok();
    })?;

    println!("Tracking started. Use 'live' to watch the train move.");
    app.tracking = Some(session);
    Ok(())
}

fn live(app: &App) -> Result<(), SimError> {
    let session = app.tracking.as_ref().ok_or(SimError::NoTrainSelected)?;
    let tracker = session.tracker();

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buffer = String::new();
        loop {
            buffer.clear();
            if io::stdin().read_line(&mut buffer).is_ok() && !buffer.trim().is_empty() {
                tx.send(()).ok();
                break;
            }
            thread::sleep(Duration::from_millis(100));
        }
    });

    loop {
        io::stdout().flush().ok();

        if let Ok(tracker_lock) = tracker.try_read() {
            clean_scr();
            println!("Tracking train {}", tracker_lock.train_number());
            println!("Status: {}", tracker_lock.status().as_str());
            match tracker_lock.position() {
                Some(position) => println!(
                    "Position: ({:.4}, {:.4})  ETA: {}s",
                    position.lat,
                    position.lng,
                    tracker_lock.remaining_secs()
                ),
                None => println!("No position available."),
            }
            if tracker_lock.is_finished() {
                println!("\nThe train has reached its destination.");
            }
            println!("\nPress 'q' and Enter to exit live mode");
        }

        if rx.try_recv().is_ok() {
            break;
        }

        thread::sleep(Duration::from_millis(STEP_INTERVAL_MILLIS));
    }
    Ok(())
}

fn stop_tracking(app: &mut App) -> Result<(), SimError> {
    match app.tracking.take() {
        Some(session) => {
            session.stop();
            println!("Tracking stopped.");
        }
        None => println!("No tracking session is running."),
    }
    Ok(())
}

fn set_alert(app: &mut App) -> Result<(), SimError> {
    if app.alert.as_ref().is_some_and(|a| a.is_active()) {
        return Err(SimError::AlertAlreadyActive);
    }

    let number = prompt_input("Enter the train number: ");
    let train = lookup_train(&app.registry, &number)?;

    let stations = train.alert_stations();
    println!("Stations you can be alerted for:");
    for (i, station) in stations.iter().enumerate() {
        println!("  {}. {} ({})", i + 1, station.name, station.code);
    }

    let choice = prompt_input("Pick a station (number): ");
    let index: usize = match choice.parse::<usize>() {
        Ok(i) if i >= 1 && i <= stations.len() => i - 1,
        _ => return Err(SimError::InvalidInput),
    };
    let station_name = stations[index].name.clone();

    let minutes_input = prompt_input("Alert me this many minutes before arrival: ");
    let minutes: u32 = match minutes_input.parse() {
        Ok(m) if m > 0 => m,
        _ => return Err(SimError::InvalidInput),
    };

    let fire_logger = app.logger.clone();
    let session = setup_alert(
        &train.number,
        &station_name,
        minutes,
        Arc::clone(&app.notifier) as Arc<dyn Notifier>,
        move || {
            fire_logger.info("Alert fired", Color::Magenta, false).ok();
        },
    )?;

    println!(
        "Alert set: train {} at {}, {} minutes before arrival.",
        session.train_number, session.station_name, session.minutes_before
    );
    app.alert = Some(session);
    Ok(())
}

fn cancel_alert(app: &mut App) -> Result<(), SimError> {
    match app.alert.take() {
        Some(session) if session.is_active() => {
            session.cancel();
            println!("Alert canceled.");
        }
        Some(_) => println!("The alert already fired."),
        None => println!("No alert is set."),
    }
    Ok(())
}

fn book_ticket(app: &App) -> Result<(), SimError> {
    clean_scr();
    let number = prompt_input("Enter the train number: ");
    let train = lookup_train(&app.registry, &number)?;
    println!(
        "Booking {} - {} ({} -> {})",
        train.number, train.name, train.source.name, train.destination.name
    );

    let passenger_name = prompt_input("Lead passenger name: ");
    let age_input = prompt_input("Lead passenger age: ");
    let passenger_age: u32 = match age_input.parse() {
        Ok(age) => age,
        Err(_) => return Err(SimError::InvalidInput),
    };

    // Pre-fill the contact phone from the logged-in user when there is one
    let phone_number = match app.sessions.current_user()? {
        Some(user) => {
            println!("Contact phone: {}", user.phone);
            user.phone
        }
        None => prompt_input("Contact phone number: "),
    };

    let mut additional_passengers = Vec::new();
    let extra_input = prompt_input("Additional passengers (0 if none): ");
    let extra: u32 = match extra_input.parse() {
        Ok(n) => n,
        Err(_) => return Err(SimError::InvalidInput),
    };
    for i in 0..extra {
        let name = prompt_input(&format!("Passenger {} name: ", i + 2));
        let age_input = prompt_input(&format!("Passenger {} age: ", i + 2));
        let age: u32 = match age_input.parse() {
            Ok(age) => age,
            Err(_) => return Err(SimError::InvalidInput),
        };
        additional_passengers.push(Passenger { name, age });
    }

    println!("\nProcessing payment...");
    thread::sleep(Duration::from_secs(1));

    let draft = TicketDraft {
        train_number: train.number.clone(),
        train_name: train.name.clone(),
        source: train.source.name.clone(),
        destination: train.destination.name.clone(),
        passenger_name,
        passenger_age,
        departure_time: train.departure_time.format("%H:%M").to_string(),
        arrival_time: train.arrival_time.format("%H:%M").to_string(),
        phone_number,
        payment_status: PaymentStatus::Paid,
        additional_passengers,
    };

    let ticket = app.tickets.book(draft)?;
    app.logger
        .info(
            &format!("Ticket {} booked for train {}", ticket.ticket_number, ticket.train_number),
            Color::Cyan,
            false,
        )
        .ok();

    println!("\nBooking confirmed!");
    println!("Ticket number: {}", ticket.ticket_number);
    println!(
        "{} -> {}, departs {}",
        ticket.source, ticket.destination, ticket.departure_time
    );
    println!(
        "{} passenger(s), payment {}",
        ticket.number_of_tickets,
        ticket.payment_status.as_str()
    );
    Ok(())
}

fn list_tickets(app: &App) -> Result<(), SimError> {
    let tickets = app.tickets.all_tickets()?;
    print_tickets(&tickets);
    Ok(())
}

fn my_tickets(app: &App) -> Result<(), SimError> {
    let phone = match app.sessions.current_user()? {
        Some(user) => user.phone,
        None => prompt_input("Enter the phone number used for booking: "),
    };
    let tickets = app.tickets.tickets_by_phone(&phone)?;
    print_tickets(&tickets);
    Ok(())
}

fn print_tickets(tickets: &[store::Ticket]) {
    if tickets.is_empty() {
        println!("No tickets found.");
        return;
    }
    println!(
        "\n{:<12} {:<8} {:<22} {:<28} {:<28} {:<6} {:<8}",
        "Ticket", "Train", "Name", "Source", "Destination", "Seats", "Payment"
    );
    for ticket in tickets {
        println!(
            "{:<12} {:<8} {:<22} {:<28} {:<28} {:<6} {:<8}",
            ticket.ticket_number,
            ticket.train_number,
            ticket.train_name,
            ticket.source,
            ticket.destination,
            ticket.number_of_tickets,
            ticket.payment_status.as_str()
        );
    }
}

fn list_stations(app: &App) {
    println!("\n{:<6} {:<30}", "Code", "Station Name");
    for station in app.registry.stations() {
        println!("{:<6} {:<30}", station.code, station.name);
    }
}

fn list_trains(app: &App) {
    println!(
        "\n{:<8} {:<22} {:<6} {:<6} {:<10}",
        "Number", "Name", "From", "To", "Duration"
    );
    for train in app.registry.trains() {
        println!(
            "{:<8} {:<22} {:<6} {:<6} {:<10}",
            train.number, train.name, train.source.code, train.destination.code, train.duration
        );
    }
}

fn signup(app: &App) -> Result<(), SimError> {
    clean_scr();
    let name = prompt_input("Full name: ");
    let email = prompt_input("Email: ");
    let gender = prompt_input("Gender: ");
    let phone = prompt_input("Phone number: ");
    let age_input = prompt_input("Age: ");
    let age: u32 = match age_input.parse() {
        Ok(age) => age,
        Err(_) => return Err(SimError::InvalidInput),
    };
    let password = prompt_input("Password: ");

    let profile = app.sessions.signup(NewUser {
        name,
        email,
        gender,
        phone,
        age,
        password,
    })?;
    println!("Welcome, {}! You are now logged in.", profile.name);
    Ok(())
}

fn login(app: &App) -> Result<(), SimError> {
    let email = prompt_input("Email: ");
    let password = prompt_input("Password: ");
    let profile = app.sessions.login(&email, &password)?;
    println!("Welcome back, {}!", profile.name);
    Ok(())
}

fn logout(app: &App) -> Result<(), SimError> {
    app.sessions.logout()?;
    println!("Logged out.");
    Ok(())
}

fn whoami(app: &App) -> Result<(), SimError> {
    match app.sessions.current_user()? {
        Some(user) => println!("{} <{}> ({})", user.name, user.email, user.phone),
        None => println!("Nobody is logged in."),
    }
    Ok(())
}

fn lookup_train<'a>(registry: &'a Registry, number: &str) -> Result<&'a Train, SimError> {
    registry
        .train_by_number(number)
        .ok_or_else(|| SimError::TrainNotFound(number.to_string()))
}

fn main() -> Result<(), SimError> {
    let logger = Logger::new(Path::new("logs"), "train-sim")
        .map_err(|e| SimError::Other(e.to_string()))?;
    let notifier_logger = Logger::new(Path::new("logs"), "notifier")
        .map_err(|e| SimError::Other(e.to_string()))?;

    let kv = KeyValueStore::open(Path::new("data"), logger.clone())?;
    let mut app = App {
        registry: Registry::with_demo_data()?,
        tickets: TicketStore::new(kv.clone()),
        sessions: SessionManager::new(kv),
        notifier: Arc::new(ConsoleNotifier::new(notifier_logger)),
        logger,
        tracker: None,
        tracking: None,
        alert: None,
    };

    loop {
        println!("Enter command (type '-h' or '--help' for options): ");
        let mut command = String::new();
        io::stdin()
            .read_line(&mut command)
            .expect("Failed to read input");

        let args: Vec<&str> = command.split_whitespace().collect();
        if args.is_empty() {
            continue;
        }

        let outcome = match args[0] {
            "search-trains" => search_trains(&app),
            "find-train" => find_train(&app),
            "track" => track(&mut app),
            "start-tracking" => start_tracking(&mut app),
            "live" => live(&app),
            "stop-tracking" => stop_tracking(&mut app),
            "set-alert" => set_alert(&mut app),
            "cancel-alert" => cancel_alert(&mut app),
            "book-ticket" => book_ticket(&app),
            "list-tickets" => list_tickets(&app),
            "my-tickets" => my_tickets(&app),
            "list-stations" => {
                list_stations(&app);
                Ok(())
            }
            "list-trains" => {
                list_trains(&app);
                Ok(())
            }
            "signup" => signup(&app),
            "login" => login(&app),
            "logout" => logout(&app),
            "whoami" => whoami(&app),
            "-h" | "--help" | "help" => {
                print_help();
                Ok(())
            }
            "exit" => break,
            _ => {
                eprintln!("Invalid command. Use -h for help.");
                Ok(())
            }
        };

        if let Err(e) = outcome {
            println!("{}", e);
        }
    }

    if let Some(session) = app.tracking.take() {
        session.stop();
    }
    if let Some(alert) = app.alert.take() {
        alert.cancel();
    }
    Ok(())
}

fn print_help() {
    clean_scr();
    println!("Available commands:");
    println!("  search-trains");
    println!("    Search the timetable. You'll be prompted for each filter.");
    println!("  find-train");
    println!("    Show the details and stops of one train.");
    println!("  track");
    println!("    Load the route of a train so it can be tracked.");
    println!("  start-tracking");
    println!("    Start moving the tracked train along its route.");
    println!("  live");
    println!("    Watch the tracked train's position update in real time.");
    println!("  stop-tracking");
    println!("    Stop the running tracking session.");
    println!("  set-alert");
    println!("    Set an arrival alert for a station on a train's route.");
    println!("  cancel-alert");
    println!("    Cancel the pending arrival alert.");
    println!("  book-ticket");
    println!("    Book a ticket on a train. You'll be prompted for each detail.");
    println!("  list-tickets");
    println!("    Show every booked ticket.");
    println!("  my-tickets");
    println!("    Show the tickets booked with your phone number.");
    println!("  list-stations");
    println!("    Show the known stations.");
    println!("  list-trains");
    println!("    Show the full timetable.");
    println!("  signup / login / logout / whoami");
    println!("    Manage the local user session.");
    println!("  exit");
    println!("    Closes this application.");
}
