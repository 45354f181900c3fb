mod basic;
mod device;
