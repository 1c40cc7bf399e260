use std::fmt::Display;

use bab_solver::baseball::EliminationError;
use bab_solver::parsers::DivisionParseError;
use bab_solver::parsers::FlowNetworkParseError;
use bab_solver::parsers::LpFormatError;
use bab_solver::parsers::VrpParseError;
use bab_solver::routing::CvrpError;
use bab_solver::search::SearchError;
use thiserror::Error;

pub(crate) type BabSolverResult<T> = Result<T, BabSolverError>;

#[derive(Error, Debug)]
pub(crate) enum BabSolverError {
    #[error("IO error, more details: {0}")]
    IOError(#[from] std::io::Error),
    #[error("The file {0} could not be opened.")]
    InvalidInstanceFile(String),
    #[error("The integer program was invalid, more details: {0}")]
    InvalidProgram(#[from] LpFormatError),
    #[error("The division was invalid, more details: {0}")]
    InvalidDivision(#[from] DivisionParseError),
    #[error("The flow network was invalid, more details: {0}")]
    InvalidFlowNetwork(#[from] FlowNetworkParseError),
    #[error("The routing instance was invalid, more details: {0}")]
    InvalidRoutingInstance(#[from] VrpParseError),
    #[error("Failed to solve the integer program, more details: {0}")]
    Search(#[from] SearchError),
    #[error("Failed to decide elimination, more details: {0}")]
    Elimination(#[from] EliminationError),
    #[error("Failed to solve the routing problem, more details: {0}")]
    Routing(#[from] CvrpError),
}

impl BabSolverError {
    pub(crate) fn invalid_instance(path: impl Display) -> Self {
        Self::InvalidInstanceFile(format!("{path}"))
    }
}
