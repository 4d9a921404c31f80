//! Partially built call requests
//!
//! Decode fills one of these field by field. Any field that has not been read
//! yet is `None`, and release only ever touches the fields that are present.

use crate::callreq::{Argument, CallRequest, Procedure};
use crate::header::MessageHeader;
use crate::teardown::Released;

/// Argument whose fields may not have been read yet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialArgument {
    pub name: Option<String>,
    pub value: Option<String>,
    pub type_name: Option<String>,
}

impl PartialArgument {
    pub fn is_complete(&self) -> bool {
        self.name.is_some() && self.value.is_some() && self.type_name.is_some()
    }

    fn text_buffers(&self) -> usize {
        [&self.name, &self.value, &self.type_name]
            .iter()
            .filter(|field| field.is_some())
            .count()
    }

    fn into_argument(self) -> Option<Argument> {
        Some(Argument {
            name: self.name?,
            value: self.value?,
            type_name: self.type_name?,
        })
    }
}

/// Call request under construction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialCallRequest {
    pub header: Option<MessageHeader>,
    pub source: Option<String>,
    pub name: Option<String>,
    /// `argument_count` as read from the wire
    pub declared_count: Option<usize>,
    pub arguments: Vec<PartialArgument>,
}

impl PartialCallRequest {
    /// First field that is still absent, in wire order
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.header.is_none() {
            return Some("header.kind");
        }
        if self.source.is_none() {
            return Some("procedure.source");
        }
        if self.name.is_none() {
            return Some("procedure.name");
        }
        let declared = match self.declared_count {
            Some(declared) => declared,
            None => return Some("argument_count"),
        };
        for argument in &self.arguments {
            if argument.name.is_none() {
                return Some("argument.name");
            }
            if argument.value.is_none() {
                return Some("argument.value");
            }
            if argument.type_name.is_none() {
                return Some("argument.type");
            }
        }
        if self.arguments.len() != declared {
            return Some("arguments");
        }
        None
    }

    pub fn is_complete(&self) -> bool {
        self.missing_field().is_none()
    }

    /// Convert into a `CallRequest`, or hand the partial back untouched if
    /// anything is still missing
    pub fn into_request(self) -> Result<CallRequest, PartialCallRequest> {
        if !self.is_complete() {
            return Err(self);
        }
        Ok(self.assemble())
    }

    /// Build a request from the fields that are present. Absent text becomes
    /// empty and arguments with an absent field are dropped, so callers must
    /// know the partial is complete.
    pub(crate) fn assemble(self) -> CallRequest {
        let procedure = Procedure::new(
            self.source.unwrap_or_default(),
            self.name.unwrap_or_default(),
        );
        let arguments = self
            .arguments
            .into_iter()
            .filter_map(PartialArgument::into_argument)
            .collect();
        CallRequest::new(procedure, arguments)
    }

    /// Release every present buffer, skipping absent ones
    pub fn release(self) -> Released {
        let mut released = Released::default();
        for argument in self.arguments {
            released += Released {
                arguments: 1,
                text_buffers: argument.text_buffers(),
            };
        }
        released.text_buffers +=
            usize::from(self.source.is_some()) + usize::from(self.name.is_some());
        released
    }
}
