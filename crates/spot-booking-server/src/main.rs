//! Server implementation

#![warn(missing_docs)]

mod http;
mod settings;

use std::path::{Path, PathBuf};
use std::thread;

use eyre::{eyre, Result, WrapErr};
use settings::Settings;
use spot_booking_core::{Config, RequestHandler};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Command line options
#[derive(Debug)]
struct Opts {
    /// Configuration of the spot booking service
    config: Config,

    /// Port for the HTTP server to listen on
    port: u16,
    /// Address for the HTTP server to bind to
    host: String,
    /// Number of worker threads
    workers: u32,
}

impl Default for Opts {
    fn default() -> Self {
        Opts {
            port: 8080,
            host: String::from("127.0.0.1"),
            config: Config::default(),
            workers: 16,
        }
    }
}

impl Opts {
    fn from_args() -> Result<Self> {
        Self::parse(std::env::args().skip(1))
    }

    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut pairs = Vec::new();
        let mut option: Option<String> = None;
        for arg in args {
            if let Some(opt) = option.take() {
                pairs.push((opt, arg));
            } else {
                option = Some(arg);
            }
        }
        if let Some(opt) = option {
            return Err(eyre!("leftover option {opt}"));
        }

        let mut opts = Opts::default();
        if let Some((_, path)) = pairs.iter().rev().find(|(opt, _)| opt == "-config") {
            opts.apply(Settings::load(Path::new(path))?);
        }

        for (opt, arg) in pairs {
            match opt.as_str() {
                "-config" => {}
                "-port" => opts.port = arg.parse().wrap_err("-port takes a decimal u16")?,
                "-host" => opts.host = arg,
                "-data" => opts.config.data = PathBuf::from(arg),
                "-workers" => {
                    opts.workers = arg.parse().wrap_err("-workers takes a decimal u32")?
                }
                _ => return Err(eyre!("unknown option {opt}")),
            }
        }
        if opts.workers == 0 {
            return Err(eyre!("-workers must be at least 1"));
        }

        Ok(opts)
    }

    fn apply(&mut self, settings: Settings) {
        if let Some(host) = settings.host {
            self.host = host;
        }
        if let Some(port) = settings.port {
            self.port = port;
        }
        if let Some(data) = settings.data {
            self.config.data = data;
        }
        if let Some(workers) = settings.workers {
            self.workers = workers;
        }
    }
}

fn http_loop<H: RequestHandler>(server: &tiny_http::Server, handler: &H) {
    loop {
        let rq = match server.recv() {
            Ok(rq) => rq,
            Err(err) => {
                error!("HTTP receive failed: {err}");
                return;
            }
        };
        if let Some(rq) = http::parse(rq) {
            handler.handle(rq);
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let opts = Opts::from_args()?;

    let service = match spot_booking_store::launch(&opts.config) {
        Ok(service) => service,
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    };

    let server = tiny_http::Server::http((opts.host.as_str(), opts.port))
        .map_err(|err| eyre!("failed to bind {}:{}: {err}", opts.host, opts.port))?;
    info!("Server is running on {}:{}...", opts.host, opts.port);

    thread::scope(|s| -> Result<()> {
        for i in 0..opts.workers {
            thread::Builder::new()
                .name(format!("worker_{i}"))
                .spawn_scoped(s, || http_loop(&server, &service))?;
        }
        Ok(())
    })?;

    service.shutdown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn defaults() {
        let opts = Opts::parse(Vec::new()).unwrap();
        assert_eq!(opts.port, 8080);
        assert_eq!(opts.host, "127.0.0.1");
        assert_eq!(opts.config.data, PathBuf::from("data.json"));
        assert_eq!(opts.workers, 16);
    }

    #[test]
    fn command_line_overrides_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        std::fs::write(&path, "port = 9000\nhost = \"0.0.0.0\"\n").unwrap();

        let opts = Opts::parse(args(&format!(
            "-port 9100 -config {} -workers 2",
            path.display()
        )))
        .unwrap();
        assert_eq!(opts.port, 9100);
        assert_eq!(opts.host, "0.0.0.0");
        assert_eq!(opts.workers, 2);
    }

    #[test]
    fn rejects_bad_options() {
        assert!(Opts::parse(args("-port")).is_err());
        assert!(Opts::parse(args("-port nope")).is_err());
        assert!(Opts::parse(args("-tickets 10")).is_err());
        assert!(Opts::parse(args("-workers 0")).is_err());
    }
}
