use std::collections::BTreeMap;
use std::path::PathBuf;

pub const DEFAULT_CONFIG: &str = "stockroom.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Routes,
    Call,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help(HelpTopic),
    Routes(RoutesArgs),
    Call(CallArgs),
}

/// Options shared by every command.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalArgs {
    pub config: PathBuf,
    /// `--config` was given explicitly, so the file must exist.
    pub config_explicit: bool,
    pub database: Option<String>,
}

impl Default for GlobalArgs {
    fn default() -> Self {
        Self {
            config: PathBuf::from(DEFAULT_CONFIG),
            config_explicit: false,
            database: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoutesArgs {
    pub global: GlobalArgs,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallArgs {
    pub global: GlobalArgs,
    pub method: String,
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub body: Option<serde_json::Value>,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match first.as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help(HelpTopic::Root)),
        "routes" => parse_routes(it.map(|s| s.as_str())),
        "call" => parse_call(it.map(|s| s.as_str())),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

/// Consume a global option at `token`. Returns `Ok(false)` when the token is
/// not a global option.
fn parse_global<'a>(
    token: &'a str,
    it: &mut impl Iterator<Item = &'a str>,
    global: &mut GlobalArgs,
) -> anyhow::Result<bool> {
    match token {
        "--config" => {
            let Some(v) = it.next() else {
                anyhow::bail!("--config requires a value");
            };
            global.config = PathBuf::from(v);
            global.config_explicit = true;
        }
        _ if token.starts_with("--config=") => {
            global.config = PathBuf::from(token.trim_start_matches("--config="));
            global.config_explicit = true;
        }
        "--database" => {
            let Some(v) = it.next() else {
                anyhow::bail!("--database requires a value");
            };
            global.database = Some(v.to_string());
        }
        _ if token.starts_with("--database=") => {
            global.database = Some(token.trim_start_matches("--database=").to_string());
        }
        _ => return Ok(false),
    }
    Ok(true)
}

fn parse_routes<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut global = GlobalArgs::default();

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Routes)),
            _ if parse_global(token, &mut it, &mut global)? => {}
            _ => anyhow::bail!("unexpected argument: {token}"),
        }
    }

    Ok(Command::Routes(RoutesArgs { global }))
}

fn parse_call<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut global = GlobalArgs::default();
    let mut positional: Vec<&str> = Vec::new();
    let mut query = BTreeMap::new();
    let mut body: Option<serde_json::Value> = None;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Call)),
            "--query" | "-q" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("{token} requires a value");
                };
                insert_pair(&mut query, v)?;
            }
            "--body" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--body requires a value");
                };
                body = Some(parse_body(v)?);
            }
            _ if token.starts_with("--body=") => {
                body = Some(parse_body(token.trim_start_matches("--body="))?);
            }
            _ if parse_global(token, &mut it, &mut global)? => {}
            _ if token.starts_with('-') && token.len() > 1 => {
                anyhow::bail!("unknown option: {token}");
            }
            _ => positional.push(token),
        }
    }

    let &[method, target] = positional.as_slice() else {
        anyhow::bail!("call requires METHOD and PATH (see `stockroom call --help`)");
    };

    // A query string on the path is merged under explicit --query values.
    let (path, inline) = target.split_once('?').unwrap_or((target, ""));
    let mut merged = BTreeMap::new();
    for pair in inline.split('&').filter(|p| !p.is_empty()) {
        insert_pair(&mut merged, pair)?;
    }
    merged.extend(query);

    Ok(Command::Call(CallArgs {
        global,
        method: method.to_string(),
        path: path.to_string(),
        query: merged,
        body,
    }))
}

fn insert_pair(query: &mut BTreeMap<String, String>, pair: &str) -> anyhow::Result<()> {
    let Some((k, v)) = pair.split_once('=') else {
        anyhow::bail!("query parameter must be key=value, got: {pair}");
    };
    if k.is_empty() {
        anyhow::bail!("query parameter has an empty key: {pair}");
    }
    query.insert(k.to_string(), v.to_string());
    Ok(())
}

fn parse_body(raw: &str) -> anyhow::Result<serde_json::Value> {
    serde_json::from_str(raw).map_err(|e| anyhow::anyhow!("--body is not valid JSON: {e}"))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
stockroom - inventory module command line

USAGE:
  stockroom <COMMAND> [OPTIONS]

COMMANDS:
  routes        List the module's routes
  call          Dispatch one request and print the reply
  help          Print this help

GLOBAL OPTIONS:
  --config <FILE>       Config file path (default: stockroom.toml)
  --database <URL>      Override database.url (also: DATABASE_URL)
  -h, --help            Print help

Run `stockroom <command> --help` for more."
            );
        }
        HelpTopic::Routes => {
            println!(
                "\
USAGE:
  stockroom routes [OPTIONS]

Prints every registered route with the endpoint it dispatches to.

OPTIONS:
  --config <FILE>       Config file path (default: stockroom.toml)
  -h, --help            Print help"
            );
        }
        HelpTopic::Call => {
            println!(
                "\
USAGE:
  stockroom call <METHOD> <PATH> [OPTIONS]

EXAMPLES:
  stockroom call GET /products --query search=bolt --query limit=10
  stockroom call GET '/stock-levels?warehouse_id=2'
  stockroom call PUT /products/12 --body '{{\"selling_price\": \"0.30\"}}'

OPTIONS:
  -q, --query <K=V>     Query parameter (repeatable)
  --body <JSON>         Request body
  --config <FILE>       Config file path (default: stockroom.toml)
  --database <URL>      Override database.url (also: DATABASE_URL)
  -h, --help            Print help

Exits non-zero when the reply is not a success."
            );
        }
    }
}
