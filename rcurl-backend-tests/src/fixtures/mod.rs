mod compressed;
mod responses;
mod retry;
