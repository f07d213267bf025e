use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum DaoError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    InvalidConfig = 4,
    AlreadyMember = 5,
    NotAMember = 6,
    InsufficientBalance = 7,
    InvalidAmount = 8,
    UnknownAuthId = 9,
    InvalidStateTransition = 10,
    WrongStatus = 11,
    NotPending = 12,
    NotContested = 13,
    WindowNotElapsed = 14,
    WindowClosed = 15,
    VotingWindowClosed = 16,
    VotingStillOpen = 17,
    AlreadyContested = 18,
    StakeMismatch = 19,
    AlreadyVoted = 20,
    InvalidChoice = 21,
    TooManyVoters = 22,
    AlreadyFinalized = 23,
    FeedbackNotFound = 24,
    FeedbackRevoked = 25,
}
