#![doc = "Dataset loading for the `efficacy` command line tool."]

pub mod loader;

pub use loader::{
    dataset_path, find_project_root, load_lab, load_population, DatasetPaths, PROJECT_MARKER,
};
