use std::{error::Error, path::PathBuf, process};

use clap::{command, Parser, Subcommand, ValueEnum, ValueHint};
use log::{debug, error, info, LevelFilter};
use serde::Serialize;
use tokio::io::AsyncWrite;
use veil::Redact;

use scloud::{
    config::Config,
    credential,
    error::Error as ApiError,
    http,
    protocol::Protocol,
    query::{LikeKind, LikesOptions, SearchKind, SearchOptions, UserOptions},
    tracks::TrackInfoOptions,
    Client,
};

/// Profile to display when not built in release mode.
#[cfg(debug_assertions)]
const BUILD_PROFILE: &str = "debug";
/// Profile to display when not built release mode.
#[cfg(not(debug_assertions))]
const BUILD_PROFILE: &str = "release";

/// Group name for mutually exclusive logging options.
const ARGS_GROUP_LOGGING: &str = "logging";

/// Command line arguments as parsed by `clap`.
#[derive(Clone, Parser, Redact)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file
    #[arg(short, long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Client ID to authenticate API requests with
    ///
    /// Overrides the configuration file. When neither sets one, a client ID
    /// is fetched from the web player.
    #[arg(long, env = "SCLOUD_CLIENT_ID", hide_env_values = true)]
    #[redact]
    client_id: Option<String>,

    /// Suppresses all output except warnings and errors.
    #[arg(short, long, default_value_t = false, group = ARGS_GROUP_LOGGING)]
    quiet: bool,

    /// Enable verbose logging
    ///
    /// Specify twice for trace logging.
    #[arg(short, long, action = clap::ArgAction::Count, group = ARGS_GROUP_LOGGING)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Print metadata of tracks, by URL or by IDs
    Track {
        #[arg(value_hint = ValueHint::Url)]
        url: Option<String>,

        /// Comma-separated track IDs
        #[arg(long, value_delimiter = ',', conflicts_with = "url")]
        ids: Vec<u64>,
    },

    /// Print a playlist with all of its tracks
    Playlist {
        #[arg(value_hint = ValueHint::Url)]
        url: String,
    },

    /// Print a user profile, by URL or by ID
    User { user: String },

    /// Print one page of the likes of a user, by URL or by ID
    Likes {
        user: String,

        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        /// Cursor to continue from
        #[arg(long)]
        offset: Option<String>,

        #[arg(short, long, value_enum, default_value_t = LikesArg::All)]
        kind: LikesArg,
    },

    /// Print one page of search results
    Search {
        query: String,

        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        #[arg(long, default_value_t = 0)]
        offset: usize,

        #[arg(short, long, value_enum, default_value_t = SearchArg::All)]
        kind: SearchArg,
    },

    /// Print the URL a track can be downloaded from
    DownloadUrl {
        #[arg(value_hint = ValueHint::Url)]
        url: String,

        #[arg(short, long, default_value = "progressive")]
        protocol: Protocol,
    },

    /// Download the audio of a track
    Download {
        #[arg(value_hint = ValueHint::Url)]
        url: String,

        /// Preferred delivery protocol
        #[arg(short, long, default_value = "hls")]
        protocol: Protocol,

        /// Output file [default: standard output]
        #[arg(short, long, value_name = "FILE", value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Fetch and print a fresh client ID from the web player
    ClientId,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum LikesArg {
    All,
    Tracks,
    Playlists,
}

impl From<LikesArg> for LikeKind {
    fn from(arg: LikesArg) -> Self {
        match arg {
            LikesArg::All => Self::All,
            LikesArg::Tracks => Self::Tracks,
            LikesArg::Playlists => Self::Playlists,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SearchArg {
    All,
    Tracks,
    Albums,
    Playlists,
    Users,
}

impl From<SearchArg> for SearchKind {
    fn from(arg: SearchArg) -> Self {
        match arg {
            SearchArg::All => Self::All,
            SearchArg::Tracks => Self::Tracks,
            SearchArg::Albums => Self::Albums,
            SearchArg::Playlists => Self::Playlists,
            SearchArg::Users => Self::Users,
        }
    }
}

/// Initializes the logger facade.
///
/// The logging level is determined as follows, in order of precedence from
/// highest to lowest:
/// 1. Command line arguments
/// 2. `RUST_LOG` environment variable
/// 3. Hard coded default
///
/// # Panics
///
/// Panics when a logger facade is already initialized.
fn init_logger(config: &Args) {
    let mut logger = env_logger::Builder::from_env(
        // Note: if you change the default logging level here, then you should
        // probably also change the verbosity levels below.
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    if config.quiet || config.verbose > 0 {
        let level = match config.verbose {
            0 => {
                // Quiet and verbose are mutually exclusive, and `verbose` is 0
                // by default. So this arm means: quiet mode.
                LevelFilter::Warn
            }
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };

        // Filter log messages of external crates.
        logger.filter_module(module_path!(), level);
    }

    logger.init();
}

/// Loads the configuration file, if any, and applies command line
/// overrides.
fn load_config(args: &Args) -> scloud::error::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    if let Some(client_id) = &args.client_id {
        config.client_id = Some(client_id.clone());
    }

    Ok(config)
}

/// A user given as either numeric ID or profile URL.
fn user_options(user: String) -> UserOptions {
    match user.parse::<u64>() {
        Ok(id) => UserOptions::id(id),
        Err(_) => UserOptions::url(user),
    }
}

fn print(value: &impl Serialize) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Runs the subcommand.
///
/// # Errors
///
/// Returns the first error of loading the configuration, talking to the
/// API, or writing output.
async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = load_config(&args)?;

    if matches!(args.command, Command::ClientId) {
        let transport = http::Client::new(&config)?;
        println!("{}", credential::fetch_client_id(&transport).await?);
        return Ok(());
    }

    let client = Client::new(&config).await?;

    match args.command {
        Command::Track { url, ids } => {
            let options = if ids.is_empty() {
                TrackInfoOptions {
                    url,
                    ..TrackInfoOptions::default()
                }
            } else {
                TrackInfoOptions::ids(ids)
            };
            print(&client.get_track_info(options).await?)
        }

        Command::Playlist { url } => print(&client.get_playlist_info(&url).await?),

        Command::User { user } => print(&client.get_user(user_options(user)).await?),

        Command::Likes {
            user,
            limit,
            offset,
            kind,
        } => {
            let user = user_options(user);
            let options = LikesOptions {
                profile_url: user.profile_url,
                id: user.id,
                limit,
                offset,
                kind: kind.into(),
            };
            print(&client.get_likes(options).await?)
        }

        Command::Search {
            query,
            limit,
            offset,
            kind,
        } => {
            let options = SearchOptions {
                limit,
                offset,
                kind: kind.into(),
                ..SearchOptions::new(query)
            };
            print(&client.search(options).await?)
        }

        Command::DownloadUrl { url, protocol } => {
            println!("{}", client.get_download_url(&url, protocol).await?);
            Ok(())
        }

        Command::Download {
            url,
            protocol,
            output,
        } => {
            let track = client
                .get_track_info(TrackInfoOptions::url(url.as_str()))
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| ApiError::not_found(format!("no track found at {url}")))?;
            let transcoding = track
                .preferred_transcoding(protocol)
                .ok_or_else(|| ApiError::not_found(format!("track {track} has no transcodings")))?;

            let mut sink: Box<dyn AsyncWrite + Unpin + Send> = match &output {
                Some(path) => Box::new(tokio::fs::File::create(path).await?),
                None => Box::new(tokio::io::stdout()),
            };

            info!("downloading {track} ({})", transcoding.format.protocol);
            let written = client.download_track(transcoding, &mut sink).await?;
            info!("wrote {written} bytes");
            Ok(())
        }

        Command::ClientId => Ok(()),
    }
}

/// Main entry point of the application.
///
/// This function initializes the logger facade, parses the command line
/// arguments, and runs the subcommand.
#[tokio::main]
async fn main() {
    // `clap` handles our command line arguments and help text.
    let args = Args::parse();
    init_logger(&args);

    // Dump command line arguments before we do anything more.
    // This aids in debugging of whatever comes next.
    debug!("Command {:#?}", args);

    let cmd = command!();
    let name = cmd.get_name().to_string();
    let version = cmd.get_version().unwrap_or("UNKNOWN").to_string();

    info!("starting {name}/{version}; {BUILD_PROFILE}");

    if let Err(e) = run(args).await {
        error!("{e}");
        process::exit(1);
    }
}
