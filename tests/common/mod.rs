pub mod recording_vault;
