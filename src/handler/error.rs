/*
 * Copyright 2017 Bitwise IO, Inc.
 * Copyright 2021 Cargill Incorporated
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 * -----------------------------------------------------------------------------
 */
use std::error::Error;

#[derive(Debug, PartialEq)]
pub enum ApplyError {
    /// Returned for an invocation the contract rejects.
    InvalidTransaction(String),
    /// Returned when an internal error occurs during invocation processing.
    InternalError(String),
}

impl Error for ApplyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl std::fmt::Display for ApplyError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            ApplyError::InvalidTransaction(ref s) => write!(f, "InvalidTransaction: {}", s),
            ApplyError::InternalError(ref s) => write!(f, "InternalError: {}", s),
        }
    }
}

#[derive(Debug)]
pub enum ContextError {
    /// Returned when an argument passed to the context is not usable, such as a zero page size
    InvalidArgument(String),
    /// Returned when the underlying world state could not be accessed
    StorageError(String),
    /// Returned when there is an issue setting receipt data
    TransactionReceiptError(String),
}

impl Error for ContextError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl std::fmt::Display for ContextError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            ContextError::InvalidArgument(ref s) => write!(f, "InvalidArgument: {}", s),
            ContextError::StorageError(ref s) => write!(f, "StorageError: {}", s),
            ContextError::TransactionReceiptError(ref s) => {
                write!(f, "TransactionReceiptError: {}", s)
            }
        }
    }
}

impl From<ContextError> for ApplyError {
    fn from(context_error: ContextError) -> Self {
        match context_error {
            ContextError::InvalidArgument(..) => {
                ApplyError::InvalidTransaction(format!("{}", context_error))
            }
            _ => ApplyError::InternalError(format!("{}", context_error)),
        }
    }
}
