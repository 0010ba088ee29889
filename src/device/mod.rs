export![camera, device, display, environment, geometry, lights, material];
