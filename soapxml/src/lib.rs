//! # soapxml - Utilitaires d'arbre XML
//!
//! Manipulation d'arbres XML pour le pilotage de webservices SOAP :
//! recherche d'éléments par nom local (indépendamment des namespaces),
//! extraction de texte par occurrence, réécriture de balises, conversion
//! d'un arbre en mapping imbriqué et helpers de sérialisation.
//!
//! ## Architecture
//!
//! - [`find`] : localisation d'éléments par nom local
//! - [`edit`] : réécriture du texte de balises existantes
//! - [`mapping`] : conversion arbre → mapping imbriqué
//! - [`io`] : parsing, sérialisation et écriture sur disque

pub mod edit;
pub mod errors;
pub mod find;
pub mod io;
pub mod mapping;

pub use edit::{Occurrence, apply_values, edit_file};
pub use errors::XmlToolError;
pub use find::{find_by_local_name, text_by_path, text_by_tag};
pub use io::{parse_file, parse_str, save_to_file, to_pretty_string, to_xml_string};
pub use mapping::{XmlValue, element_to_mapping};
