use snafu::Snafu;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("MalformedPayload: {message}, {location}"))]
    MalformedPayload {
        message: String,
        location: snafu::Location,
    },
    #[snafu(display("UnknownVariant: {message}, {location}"))]
    UnknownVariant {
        message: String,
        location: snafu::Location,
    },
    #[snafu(display("UnavailablePosition: {message}, {location}"))]
    UnavailablePosition {
        message: String,
        location: snafu::Location,
    },
    #[snafu(display("InvalidConfig: {message}, {location}"))]
    InvalidConfig {
        message: String,
        location: snafu::Location,
    },
}
