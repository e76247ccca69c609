//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::client_request::{ClientRequest, NewClientRequest, UpdateClientRequest};
use crate::domain::service::{NewService, Service, UpdateService};
use crate::domain::types::{ClientRequestId, ServiceId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ClientRequestListQuery, ClientRequestReader, ClientRequestWriter, ServiceListQuery,
    ServiceReader, ServiceWriter,
};

mock! {
    pub Repository {}

    impl ServiceReader for Repository {
        fn get_service_by_id(&self, id: ServiceId) -> RepositoryResult<Option<Service>>;
        fn list_services(&self, query: ServiceListQuery) -> RepositoryResult<(usize, Vec<Service>)>;
    }

    impl ServiceWriter for Repository {
        fn create_service(&self, new_service: &NewService) -> RepositoryResult<Service>;
        fn update_service(&self, id: ServiceId, updates: &UpdateService) -> RepositoryResult<Service>;
        fn deactivate_service(&self, id: ServiceId) -> RepositoryResult<Service>;
    }

    impl ClientRequestReader for Repository {
        fn get_client_request_by_id(
            &self,
            id: ClientRequestId,
        ) -> RepositoryResult<Option<ClientRequest>>;
        fn list_client_requests(
            &self,
            query: ClientRequestListQuery,
        ) -> RepositoryResult<(usize, Vec<ClientRequest>)>;
    }

    impl ClientRequestWriter for Repository {
        fn create_client_request(&self, request: &NewClientRequest) -> RepositoryResult<ClientRequest>;
        fn update_client_request(
            &self,
            id: ClientRequestId,
            updates: &UpdateClientRequest,
        ) -> RepositoryResult<ClientRequest>;
        fn delete_client_request(&self, id: ClientRequestId) -> RepositoryResult<()>;
    }
}
