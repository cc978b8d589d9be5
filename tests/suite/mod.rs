mod config_loading;
mod full_round;
mod roster_loading;
