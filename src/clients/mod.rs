pub mod runner_client;
