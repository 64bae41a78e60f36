mod aws;
mod transport;
