use anyhow::Result;
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use folio::config::Config;
use folio::markdown::Compiler;
use folio::recommend::checked_limit;
use folio::{sort_by_date, Direction, Loader, Selector};
use log::debug;
use std::path::PathBuf;

fn main() -> Result<()> {
    env_logger::init();

    let matches = App::new("folio")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspects the articles of a blog's content directory")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("project")
                .long("project")
                .short("p")
                .takes_value(true)
                .value_name("DIR")
                .help("Directory from which to search for folio.yaml (default: current directory)"),
        )
        .subcommand(SubCommand::with_name("list").about("Lists articles, newest first"))
        .subcommand(
            SubCommand::with_name("show")
                .about("Prints an article's metadata and compiled body")
                .arg(identifier_arg()),
        )
        .subcommand(
            SubCommand::with_name("related")
                .about("Prints the articles related to an article")
                .arg(identifier_arg())
                .arg(
                    Arg::with_name("limit")
                        .long("limit")
                        .short("n")
                        .takes_value(true)
                        .allow_hyphen_values(true)
                        .help("Maximum number of related articles (default: from folio.yaml)"),
                ),
        )
        .subcommand(
            SubCommand::with_name("thumbnail")
                .about("Prints an article's SVG thumbnail")
                .arg(identifier_arg()),
        )
        .get_matches();

    let project_dir = match matches.value_of("project") {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };
    let config = Config::from_directory(&project_dir.canonicalize()?)?;
    debug!("using {:?}", config);

    match matches.subcommand() {
        ("list", Some(_)) => list(&config),
        ("show", Some(args)) => show(&config, args),
        ("related", Some(args)) => related(&config, args),
        ("thumbnail", Some(args)) => thumbnail(&config, args),
        _ => unreachable!("clap requires a subcommand"),
    }
}

fn identifier_arg() -> Arg<'static, 'static> {
    Arg::with_name("identifier")
        .required(true)
        .index(1)
        .help("The article's identifier (its slug)")
}

fn list(config: &Config) -> Result<()> {
    let documents = Loader::new(&config.content_directory).all_documents()?;
    for document in sort_by_date(documents, Direction::Descending) {
        println!(
            "{}  {:<40}  {:<16}  {}",
            document.published_date(),
            document.identifier,
            document.metadata.category,
            document.metadata.title
        );
    }
    Ok(())
}

fn show(config: &Config, args: &ArgMatches) -> Result<()> {
    let identifier = args.value_of("identifier").unwrap_or_default();
    let document = Loader::new(&config.content_directory).document(identifier)?;
    let metadata = &document.metadata;
    println!("title:       {}", metadata.title);
    println!("description: {}", metadata.description);
    println!("category:    {}", metadata.category);
    println!("date:        {}", metadata.published_date);
    println!("keywords:    {}", metadata.keywords.join(", "));
    for asset in &document.assets {
        println!("asset:       {}", asset.display());
    }
    println!();
    let compiler = Compiler::new(&config.articles_url);
    let body = document
        .compiled_body(&compiler)
        .map_err(|err| folio::Error::Compile {
            identifier: document.identifier.clone(),
            err,
        })?;
    println!("{}", body);
    Ok(())
}

fn related(config: &Config, args: &ArgMatches) -> Result<()> {
    let identifier = args.value_of("identifier").unwrap_or_default();
    let limit = match args.value_of("limit") {
        Some(limit) => checked_limit(limit.parse()?)?,
        None => config.related_limit,
    };
    let loader = Loader::new(&config.content_directory);
    let documents = loader.all_documents()?;
    let source = documents
        .iter()
        .find(|d| d.identifier == identifier)
        .ok_or_else(|| folio::Error::NotFound(identifier.to_owned()))?;
    let selector = Selector::new(config.weights);
    for document in selector.recommend(source, documents.iter().map(|d| &**d), limit) {
        println!(
            "{:>4}  {}  {}",
            selector.score(source, document),
            document.published_date(),
            document.identifier
        );
    }
    Ok(())
}

fn thumbnail(config: &Config, args: &ArgMatches) -> Result<()> {
    let identifier = args.value_of("identifier").unwrap_or_default();
    let document = Loader::new(&config.content_directory).document(identifier)?;
    println!("{}", document.thumbnail.svg());
    Ok(())
}
