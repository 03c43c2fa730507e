mod bootstrap;
mod check_ip;
mod health;
mod visitors;
