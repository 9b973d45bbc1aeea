//! Posecraft CLI — Command-line interface for pose keypoint transforms.
//!
//! Usage:
//!   posecraft parts                    List body-part groups
//!   posecraft select <MODE>            Build a keypoint selection
//!   posecraft filter <IN>              Hide keypoints outside a selection
//!   posecraft move <IN>                Translate keypoints
//!   posecraft attach <BASE> <ATTACH>   Graft one pose onto another
//!   posecraft merge <IN>...            Combine sequences into one
//!   posecraft smooth <IN>              Temporal smoothing
//!   posecraft info <IN>                Show sequence information
//!
//! Transform commands write pose JSON to `--output`, or stdout if omitted.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use posecraft_common::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "posecraft",
    about = "Keypoint transforms for OpenPose-style pose sequences",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by the transform commands.
#[derive(Args, Clone, Debug)]
pub struct TransformArgs {
    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Where a selection comes from.
#[derive(Args, Clone, Debug, Default)]
pub struct SelectionArgs {
    /// Selection JSON written by `posecraft select`
    #[arg(long, value_name = "PATH")]
    pub selection: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List body-part group names and their keypoint indices
    Parts,

    /// Build a selection from a mode and part toggles
    Select {
        /// "custom" or a body-part group name
        #[arg(default_value = "all")]
        mode: String,

        #[arg(long)]
        no_head: bool,
        #[arg(long)]
        no_neck: bool,
        #[arg(long)]
        no_torso: bool,
        #[arg(long)]
        no_left_arm: bool,
        #[arg(long)]
        no_right_arm: bool,
        #[arg(long)]
        no_left_leg: bool,
        #[arg(long)]
        no_right_leg: bool,
        #[arg(long)]
        no_left_hand: bool,
        #[arg(long)]
        no_right_hand: bool,
        #[arg(long)]
        no_face: bool,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Hide keypoints outside (or inside) a selection
    Filter {
        /// Input pose JSON
        input: PathBuf,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Body-part group to keep, when no selection file is given
        #[arg(long)]
        part: Option<String>,

        /// Person index; negative means every person
        #[arg(long, default_value = "-1", allow_hyphen_values = true)]
        person: i64,

        /// Hide the selected keypoints instead
        #[arg(long)]
        invert: bool,

        #[command(flatten)]
        transform: TransformArgs,
    },

    /// Translate keypoints by a constant or per-frame offset
    Move {
        /// Input pose JSON
        input: PathBuf,

        /// Constant x offset
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        x: f64,

        /// Constant y offset
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        y: f64,

        /// Per-frame x offsets, comma separated (overrides --x)
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        x_list: Option<Vec<f64>>,

        /// Per-frame y offsets, comma separated (overrides --y)
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        y_list: Option<Vec<f64>>,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Body-part group moved when no selection is given
        #[arg(long, default_value = "all")]
        part: String,

        /// Person index; negative means every person
        #[arg(long, default_value = "-1", allow_hyphen_values = true)]
        person: i64,

        /// Offset list length policy: truncate|loop|repeat
        #[arg(long)]
        mismatch: Option<String>,

        /// Move a hand along with its wrist
        #[arg(long)]
        affect_hands: bool,

        /// Move the face along with the head
        #[arg(long)]
        affect_face: bool,

        #[command(flatten)]
        transform: TransformArgs,
    },

    /// Attach keypoints from one sequence onto another at an anchor
    Attach {
        /// Base pose JSON
        base: PathBuf,

        /// Attachment pose JSON
        attachment: PathBuf,

        /// Anchor keypoint: index, name, or "4: RWrist"
        #[arg(long, default_value = "4")]
        anchor: String,

        #[command(flatten)]
        selection: SelectionArgs,

        #[arg(long, default_value = "0")]
        base_person: usize,

        #[arg(long, default_value = "0")]
        attachment_person: usize,

        /// Transplant both hands
        #[arg(long)]
        hands: bool,

        /// Transplant the face
        #[arg(long)]
        face: bool,

        #[command(flatten)]
        transform: TransformArgs,
    },

    /// Merge several sequences into one multi-person sequence
    Merge {
        /// Input pose JSON files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Canvas width
        #[arg(long)]
        width: Option<u32>,

        /// Canvas height
        #[arg(long)]
        height: Option<u32>,

        #[command(flatten)]
        transform: TransformArgs,
    },

    /// Exponentially smooth keypoints across frames
    Smooth {
        /// Input pose JSON
        input: PathBuf,

        /// Smoothing factor [0.0, 1.0]; lower is smoother
        #[arg(long)]
        factor: Option<f64>,

        /// Focus keypoint smoothed first: index, name, or "1: Neck"
        #[arg(long)]
        focus: Option<String>,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Person index; negative means every person
        #[arg(long, default_value = "-1", allow_hyphen_values = true)]
        person: i64,

        /// Leave hands unsmoothed
        #[arg(long)]
        no_hands: bool,

        /// Smooth the face too
        #[arg(long)]
        face: bool,

        #[command(flatten)]
        transform: TransformArgs,
    },

    /// Show sequence information
    Info {
        /// Input pose JSON
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load();

    // Initialize logging
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    posecraft_common::logging::init_logging(&config.logging);

    let defaults = &config.defaults;

    match cli.command {
        Commands::Parts => commands::parts::run(),
        Commands::Select {
            mode,
            no_head,
            no_neck,
            no_torso,
            no_left_arm,
            no_right_arm,
            no_left_leg,
            no_right_leg,
            no_left_hand,
            no_right_hand,
            no_face,
            output,
        } => {
            let builder = posecraft_pose_model::SelectionBuilder {
                mode: posecraft_pose_model::SelectionMode::parse(&mode),
                include_head: !no_head,
                include_neck: !no_neck,
                include_torso: !no_torso,
                include_left_arm: !no_left_arm,
                include_right_arm: !no_right_arm,
                include_left_leg: !no_left_leg,
                include_right_leg: !no_right_leg,
                include_left_hand: !no_left_hand,
                include_right_hand: !no_right_hand,
                include_face: !no_face,
            };
            commands::select::run(builder, output)
        }
        Commands::Filter {
            input,
            selection,
            part,
            person,
            invert,
            transform,
        } => commands::filter::run(input, selection, part, person, invert, transform),
        Commands::Move {
            input,
            x,
            y,
            x_list,
            y_list,
            selection,
            part,
            person,
            mismatch,
            affect_hands,
            affect_face,
            transform,
        } => commands::move_keypoints::run(
            input,
            commands::move_keypoints::MoveOptions {
                x,
                y,
                x_list,
                y_list,
                part,
                person,
                mismatch: mismatch.unwrap_or_else(|| defaults.mismatch_policy.clone()),
                affect_hands,
                affect_face,
            },
            selection,
            transform,
        ),
        Commands::Attach {
            base,
            attachment,
            anchor,
            selection,
            base_person,
            attachment_person,
            hands,
            face,
            transform,
        } => commands::attach::run(
            base,
            attachment,
            &anchor,
            selection,
            (base_person, attachment_person),
            (hands, face),
            transform,
        ),
        Commands::Merge {
            inputs,
            width,
            height,
            transform,
        } => commands::merge::run(
            inputs,
            width.unwrap_or(defaults.canvas_width),
            height.unwrap_or(defaults.canvas_height),
            transform,
        ),
        Commands::Smooth {
            input,
            factor,
            focus,
            selection,
            person,
            no_hands,
            face,
            transform,
        } => commands::smooth::run(
            input,
            factor.unwrap_or(defaults.smoothing_factor),
            focus.as_deref(),
            selection,
            person,
            (defaults.smooth_hands && !no_hands, defaults.smooth_face || face),
            transform,
        ),
        Commands::Info { input, json } => commands::info::run(input, json),
    }
}
