//! # Gafete CLI
//!
//! Command-line interface for offline badge rendering and template
//! maintenance.
//!
//! ## Usage
//!
//! ```bash
//! # Write the default badge template for an event
//! gafete init --event evt-1 --out template.json
//!
//! # Validate a template before uploading it
//! gafete validate template.json
//!
//! # Render one registration to a scene-graph JSON on stdout
//! gafete render template.json registrations.json
//!
//! # Render every registration into a directory, in parallel
//! gafete bulk template.json registrations.json --out-dir scenes/
//! ```

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use gafete::GafeteError;
use gafete::guest::Registration;
use gafete::render;
use gafete::template::{Template, validate};

/// Gafete - badge template utility
#[derive(Parser, Debug)]
#[command(name = "gafete")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write the default badge template to a file
    Init {
        /// Event id recorded on the template
        #[arg(long, default_value = "local")]
        event: String,

        /// Output path
        #[arg(long, default_value = "template.json")]
        out: PathBuf,
    },

    /// Check a template file for violations
    Validate {
        /// Template JSON file
        template: PathBuf,
    },

    /// Render one registration to scene-graph JSON
    Render {
        /// Template JSON file
        template: PathBuf,

        /// Registrations JSON file (array)
        registrations: PathBuf,

        /// Which registration in the array to render
        #[arg(long, default_value = "0")]
        index: usize,

        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Render every registration to one scene file each
    Bulk {
        /// Template JSON file
        template: PathBuf,

        /// Registrations JSON file (array)
        registrations: PathBuf,

        /// Output directory for scene files
        #[arg(long, default_value = "scenes")]
        out_dir: PathBuf,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), GafeteError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { event, out } => {
            let template = Template::default_badge(&event);
            fs::write(&out, serde_json::to_string_pretty(&template)?)?;
            println!("Wrote default template for event {} to {}", event, out.display());
        }

        Commands::Validate { template } => {
            let template = load_template(&template)?;
            let violations = validate(&template);
            if violations.is_empty() {
                println!("Template {} is valid", template.name);
            } else {
                for v in &violations {
                    eprintln!("  {}", v);
                }
                return Err(GafeteError::InvalidTemplate(format!(
                    "{} violation(s)",
                    violations.len()
                )));
            }
        }

        Commands::Render {
            template,
            registrations,
            index,
            out,
        } => {
            let template = load_template(&template)?;
            let regs = load_registrations(&registrations)?;
            let reg = regs.get(index).ok_or_else(|| {
                GafeteError::InvalidTemplate(format!(
                    "registration index {} out of range ({} available)",
                    index,
                    regs.len()
                ))
            })?;
            let scene = render::render(&template, reg);
            let json = serde_json::to_string_pretty(&scene)?;
            match out {
                Some(path) => fs::write(path, json)?,
                None => println!("{}", json),
            }
        }

        Commands::Bulk {
            template,
            registrations,
            out_dir,
        } => {
            let template = load_template(&template)?;
            let regs = load_registrations(&registrations)?;
            fs::create_dir_all(&out_dir)?;

            let scenes = render::render_bulk(&template, &regs);
            for (reg, scene) in regs.iter().zip(&scenes) {
                let path = out_dir.join(format!("reg-{}.json", reg.id));
                fs::write(path, serde_json::to_string_pretty(scene)?)?;
            }
            println!("Rendered {} badge(s) into {}", scenes.len(), out_dir.display());
        }
    }

    Ok(())
}

fn load_template(path: &PathBuf) -> Result<Template, GafeteError> {
    let data = fs::read_to_string(path)?;
    let blob: serde_json::Value = serde_json::from_str(&data)?;
    gafete::template::template_from_blob("local", &blob)
}

fn load_registrations(path: &PathBuf) -> Result<Vec<Registration>, GafeteError> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}
