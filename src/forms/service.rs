use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::service::{Category, NewService, UpdateService};
use crate::domain::types::{
    EmailAddress, LeadTimeDays, Price, Priority, ServiceDescription, ServiceName,
    TypeConstraintError,
};
use crate::forms::{
    BOOLEAN_MESSAGE, DECIMAL_MESSAGE, FormError, INTEGER_MESSAGE, JsonFields, STRING_MESSAGE,
    TypeMismatch, WriteMode, error_with_message, into_result, record_mismatches, reject_blank,
    require, take,
};

fn validate_category(value: &str) -> Result<(), ValidationError> {
    Category::from_str(value).map(|_| ()).map_err(|_| {
        error_with_message("invalid_choice", format!("\"{value}\" no es una elección válida."))
    })
}

fn validate_price(value: &Decimal) -> Result<(), ValidationError> {
    match Price::new(*value) {
        Ok(_) => Ok(()),
        Err(TypeConstraintError::NegativePrice) => Err(error_with_message(
            "negative",
            "El precio no puede ser negativo.",
        )),
        Err(TypeConstraintError::PriceTooPrecise) => Err(error_with_message(
            "max_decimal_places",
            "Asegúrese de que no haya más de 2 decimales.",
        )),
        Err(_) => Err(error_with_message(
            "max_digits",
            "Asegúrese de que no haya más de 10 dígitos en total.",
        )),
    }
}

/// Body of `POST /services`, `PUT /services/{id}` and `PATCH /services/{id}`.
///
/// Every field is optional at the parsing stage; [`WriteMode`] decides which
/// ones must be present. Read-only fields sent by the client are ignored.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ServicePayload {
    #[validate(length(max = 100, message = "Asegúrese de que este campo no tenga más de 100 caracteres."))]
    pub nombre: Option<String>,
    #[validate(custom(function = "validate_category"))]
    pub categoria: Option<String>,
    pub descripcion: Option<String>,
    #[validate(custom(function = "validate_price"))]
    pub precio_mxn: Option<Decimal>,
    pub activo: Option<bool>,
    #[validate(range(min = 1, max = 5, message = "El nivel de prioridad debe estar entre 1 y 5."))]
    pub nivel_prioridad: Option<i32>,
    #[validate(
        length(max = 254, message = "Asegúrese de que este campo no tenga más de 254 caracteres."),
        email(message = "El email proporcionado no es válido.")
    )]
    pub responsable_email: Option<String>,
    #[validate(range(min = 0, message = "El tiempo estimado no puede ser negativo."))]
    pub tiempo_estimado_dias: Option<i32>,
    /// Fields that arrived with the wrong JSON type.
    #[serde(skip)]
    pub type_errors: Vec<TypeMismatch>,
}

impl ServicePayload {
    /// Reads a request body field by field. Wrong types end up in
    /// `type_errors` instead of failing the whole body.
    pub fn from_json(body: Value) -> Self {
        let mut fields = JsonFields::new(body);
        Self {
            nombre: fields.take("nombre", STRING_MESSAGE),
            categoria: fields.take("categoria", STRING_MESSAGE),
            descripcion: fields.take("descripcion", STRING_MESSAGE),
            precio_mxn: fields.take("precio_mxn", DECIMAL_MESSAGE),
            activo: fields.take("activo", BOOLEAN_MESSAGE),
            nivel_prioridad: fields.take("nivel_prioridad", INTEGER_MESSAGE),
            responsable_email: fields.take("responsable_email", STRING_MESSAGE),
            tiempo_estimado_dias: fields.take("tiempo_estimado_dias", INTEGER_MESSAGE),
            type_errors: fields.into_mismatches(),
        }
    }

    /// Runs field validators, then the object-level checks for `mode`.
    pub fn collect_errors(&self, mode: WriteMode) -> ValidationErrors {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);

        reject_blank(
            &mut errors,
            "nombre",
            self.nombre.as_deref(),
            "El nombre no puede estar vacío.",
        );
        reject_blank(
            &mut errors,
            "descripcion",
            self.descripcion.as_deref(),
            "La descripción no puede estar vacía.",
        );

        if mode == WriteMode::Full {
            require(&mut errors, "nombre", self.nombre.is_some());
            require(&mut errors, "categoria", self.categoria.is_some());
            require(&mut errors, "descripcion", self.descripcion.is_some());
            require(&mut errors, "precio_mxn", self.precio_mxn.is_some());
            require(&mut errors, "responsable_email", self.responsable_email.is_some());
        }
        record_mismatches(&mut errors, &self.type_errors);

        errors
    }

    pub fn validate_for(&self, mode: WriteMode) -> Result<(), FormError> {
        into_result(self.collect_errors(mode))
    }

    /// Converts a validated payload into a new catalog entry.
    ///
    /// Omitted optional fields take the catalog defaults.
    pub fn into_new_service(self) -> Result<NewService, FormError> {
        let name = ServiceName::new(take(self.nombre, "nombre")?)?;
        let category = Category::from_str(&take(self.categoria, "categoria")?)?;
        let description = ServiceDescription::new(take(self.descripcion, "descripcion")?)?;
        let price = Price::new(take(self.precio_mxn, "precio_mxn")?)?;
        let owner_email = EmailAddress::new(take(self.responsable_email, "responsable_email")?)?;

        let mut service = NewService::new(name, category, description, price, owner_email);
        if let Some(active) = self.activo {
            service = service.with_active(active);
        }
        if let Some(priority) = self.nivel_prioridad {
            service = service.with_priority(Priority::new(priority)?);
        }
        if let Some(days) = self.tiempo_estimado_dias {
            service = service.with_lead_time(LeadTimeDays::new(days)?);
        }
        Ok(service)
    }

    /// Converts a validated payload into a changeset holding only the
    /// provided fields.
    pub fn into_update(self) -> Result<UpdateService, FormError> {
        Ok(UpdateService {
            name: self.nombre.map(ServiceName::new).transpose()?,
            category: self
                .categoria
                .as_deref()
                .map(Category::from_str)
                .transpose()?,
            description: self.descripcion.map(ServiceDescription::new).transpose()?,
            price: self.precio_mxn.map(Price::new).transpose()?,
            active: self.activo,
            priority: self.nivel_prioridad.map(Priority::new).transpose()?,
            owner_email: self.responsable_email.map(EmailAddress::new).transpose()?,
            lead_time_days: self
                .tiempo_estimado_dias
                .map(LeadTimeDays::new)
                .transpose()?,
        })
    }
}
