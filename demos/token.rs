use tokenvault::{CredentialStore, StorageLocation, StaticPassphrase};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: token <save VALUE | get | delete | path>";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let store = CredentialStore::new(StorageLocation::default(), StaticPassphrase::default());

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["save", value] => {
            store.save_token(value)?;
            println!("Saved successfully.");
        }
        ["get"] => match store.get_token()? {
            Some(token) => println!("{token}"),
            None => println!("No token stored."),
        },
        ["delete"] => {
            store.delete_token()?;
            println!("Deleted.");
        }
        ["path"] => println!("{}", store.path()?.display()),
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }

    Ok(())
}
